//! 问卷答案共享存储
//!
//! 整个向导会话只有一个 `AnswerStore`，由 `WizardSession` 在向导开始时创建，
//! 通过构造参数传给每个步骤。仅保存在内存中，进程退出即丢失。

use crate::answers::{Answers, AnswersPatch};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

/// 答案聚合的共享句柄，克隆后指向同一份数据
#[derive(Debug, Clone)]
pub struct AnswerStore {
    inner: Arc<watch::Sender<Answers>>,
}

impl Default for AnswerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::with_answers(Answers::new())
    }

    /// 使用已有答案初始化（恢复会话）
    pub fn with_answers(answers: Answers) -> Self {
        let (sender, _) = watch::channel(answers);
        Self {
            inner: Arc::new(sender),
        }
    }

    /// 获取当前答案快照
    pub fn read(&self) -> Answers {
        self.inner.borrow().clone()
    }

    /// 合并补丁：补丁中的键覆盖旧值，其余键保持不变
    ///
    /// 不做任何校验，调用方负责提供一致的补丁。非空补丁合并后通知订阅者，空补丁直接忽略。
    pub fn merge(&self, patch: AnswersPatch) {
        if patch.is_empty() {
            return;
        }
        if log::log_enabled!(log::Level::Debug) {
            let keys: Vec<&str> = patch.keys().collect();
            log::debug!("merging answers patch: {:?}", keys);
        }
        self.inner.send_modify(|answers| answers.apply(patch));
    }

    /// 订阅答案变更
    pub fn subscribe(&self) -> watch::Receiver<Answers> {
        self.inner.subscribe()
    }
}

/// 向导会话上下文
#[derive(Debug, Clone)]
pub struct WizardSession {
    answers: AnswerStore,
    started_at: DateTime<Utc>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self::resume(Answers::new())
    }

    pub fn resume(answers: Answers) -> Self {
        Self {
            answers: AnswerStore::with_answers(answers),
            started_at: Utc::now(),
        }
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
