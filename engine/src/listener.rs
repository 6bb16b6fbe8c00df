//! 引擎监听者

use std::sync::Mutex;

use common::ScrapeOutcome;
use tokio::sync::oneshot;

/// 抓取结果监听者
///
/// 每次 `start()` 最多收到一次回调，成功和失败互斥。
/// 回调运行在引擎的后台任务上，不持有引擎的锁。
pub trait ScrapeListener<T>: Send + Sync {
    fn on_outcome(&self, outcome: &ScrapeOutcome<T>);
}

impl<T, F> ScrapeListener<T> for F
where
    F: Fn(&ScrapeOutcome<T>) + Send + Sync,
{
    fn on_outcome(&self, outcome: &ScrapeOutcome<T>) {
        self(outcome)
    }
}

/// 把结果转发到一次性通道的监听者
pub(crate) struct OneshotListener<T> {
    sender: Mutex<Option<oneshot::Sender<ScrapeOutcome<T>>>>,
}

impl<T> OneshotListener<T> {
    pub(crate) fn new(sender: oneshot::Sender<ScrapeOutcome<T>>) -> Self {
        Self {
            sender: Mutex::new(Some(sender)),
        }
    }
}

impl<T: Send + Sync> ScrapeListener<T> for OneshotListener<T> {
    fn on_outcome(&self, outcome: &ScrapeOutcome<T>) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match sender {
            Some(sender) => {
                if sender.send(outcome.clone()).is_err() {
                    log::debug!("Result receiver dropped before delivery");
                }
            }
            None => log::debug!("One-shot listener already used, outcome dropped"),
        }
    }
}
