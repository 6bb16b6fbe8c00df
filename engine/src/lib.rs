//! 通用抓取引擎
//!
//! 一个 [`ScraperEngine`] 绑定一个地址和一个提取器：
//!
//! - [`ScraperEngine::start`] 在后台任务中获取页面并运行提取器，立即返回
//! - 同一实例同时最多只有一个请求在进行，重复调用会被忽略
//! - 完成时只通知**完成那一刻**注册着的监听者
//! - 最近一次成功的结果会被缓存，失败不会清除缓存
//!
//! # 模块结构
//!
//! - [`listener`] - 监听者接口与一次性结果通道

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use common::{Document, Extractor, Fetcher, ScrapeError, ScrapeOutcome};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

pub mod listener;

pub use listener::ScrapeListener;
use listener::OneshotListener;

// ============================================================================
// 引擎
// ============================================================================

/// 通用抓取引擎
///
/// 克隆得到的是同一个引擎的句柄，监听者可以持有它并在回调中再次调用 `start()`。
pub struct ScraperEngine<E: Extractor> {
    inner: Arc<Inner<E>>,
}

impl<E: Extractor> Clone for ScraperEngine<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<E: Extractor> {
    url: String,
    extractor: E,
    fetcher: Arc<dyn Fetcher>,
    runtime: Handle,
    running: AtomicBool,
    state: Mutex<State<E::Output>>,
}

struct State<T> {
    listener: Option<Arc<dyn ScrapeListener<T>>>,
    last_result: Option<Arc<T>>,
}

impl<E: Extractor> ScraperEngine<E> {
    /// 创建引擎，后台任务运行在当前的 tokio 运行时上
    ///
    /// # Panics
    ///
    /// 不在 tokio 运行时中调用时 panic，与 `tokio::spawn` 相同。
    pub fn new(url: impl Into<String>, extractor: E, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_runtime(url, extractor, fetcher, Handle::current())
    }

    /// 创建引擎，后台任务运行在指定的运行时上
    pub fn with_runtime(
        url: impl Into<String>,
        extractor: E,
        fetcher: Arc<dyn Fetcher>,
        runtime: Handle,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                url: url.into(),
                extractor,
                fetcher,
                runtime,
                running: AtomicBool::new(false),
                state: Mutex::new(State {
                    listener: None,
                    last_result: None,
                }),
            }),
        }
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// 开始一次抓取
    ///
    /// 已有请求在进行时什么也不做并返回 `false`。
    pub fn start(&self) -> bool {
        let inner = &self.inner;

        if inner
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::info!(
                "[{}] Fetch already in flight for {}, start ignored",
                inner.extractor.name(),
                inner.url
            );
            return false;
        }

        log::debug!("[{}] Starting fetch: {}", inner.extractor.name(), inner.url);
        let task = Arc::clone(inner);
        inner.runtime.spawn(task.run());
        true
    }

    /// 是否有请求在进行（仅供参考）
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// 最近一次成功的结果
    pub fn last_result(&self) -> Option<Arc<E::Output>> {
        self.inner.state().last_result.clone()
    }

    /// 注册监听者，替换已有的监听者
    pub fn register_listener<L>(&self, listener: L)
    where
        L: ScrapeListener<E::Output> + 'static,
    {
        log::debug!("[{}] Set new listener", self.inner.extractor.name());
        self.inner.state().listener = Some(Arc::new(listener));
    }

    /// 移除监听者
    pub fn remove_listener(&self) {
        log::debug!("[{}] Remove listener", self.inner.extractor.name());
        self.inner.state().listener = None;
    }

    /// 以一次性通道的形式注册监听者
    ///
    /// 监听者被替换或移除后，返回的接收端会收到通道关闭。
    pub fn subscribe(&self) -> oneshot::Receiver<ScrapeOutcome<E::Output>> {
        let (sender, receiver) = oneshot::channel();
        self.register_listener(OneshotListener::new(sender));
        receiver
    }

    /// 订阅结果并开始抓取，等待本轮结果
    ///
    /// 如果已有请求在进行，则等待那一次的结果。
    pub async fn load(&self) -> ScrapeOutcome<E::Output> {
        let receiver = self.subscribe();
        self.start();

        receiver.await.unwrap_or_else(|_| {
            Err(ScrapeError::Aborted(
                "listener was replaced before the fetch completed".to_string(),
            ))
        })
    }
}

impl<E: Extractor> Inner<E> {
    fn state(&self) -> MutexGuard<'_, State<E::Output>> {
        // 锁内不会执行外部代码，中毒时直接取回数据
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn run(self: Arc<Self>) {
        let fetcher = Arc::clone(&self.fetcher);
        let url = self.url.clone();

        // 获取放在单独的任务里，获取器 panic 也能走失败路径
        let fetched = self
            .runtime
            .spawn(async move { fetcher.fetch(&url).await })
            .await;

        let outcome = match fetched {
            Ok(Ok(document)) => {
                log::debug!("[{}] Start parsing the page", self.extractor.name());
                self.extract(&document)
            }
            Ok(Err(e)) => Err(ScrapeError::Transport(e)),
            Err(e) => Err(ScrapeError::Aborted(format!("fetch task failed: {}", e))),
        };

        self.dispatch(outcome);
    }

    fn extract(&self, document: &Document) -> ScrapeOutcome<E::Output> {
        match catch_unwind(AssertUnwindSafe(|| self.extractor.extract(document))) {
            Ok(Ok(output)) => Ok(Arc::new(output)),
            Ok(Err(e)) => Err(e),
            Err(payload) => Err(ScrapeError::Aborted(panic_message(payload.as_ref()))),
        }
    }

    fn dispatch(&self, outcome: ScrapeOutcome<E::Output>) {
        let name = self.extractor.name();

        // 缓存结果、清除运行标志、取监听者快照在同一把锁内完成
        let listener = {
            let mut state = self.state();
            if let Ok(result) = &outcome {
                state.last_result = Some(Arc::clone(result));
            }
            self.running.store(false, Ordering::Release);
            state.listener.clone()
        };

        match &outcome {
            Ok(_) => log::debug!("[{}] Fetch succeeded: {}", name, self.url),
            Err(e) => log::warn!("[{}] Fetch failed: {}: {}", name, self.url, e),
        }

        match listener {
            Some(listener) => listener.on_outcome(&outcome),
            None => log::debug!("[{}] No listener registered, result not delivered", name),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
