use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use shelfwise_kernel::{settings::Settings, InitCtx, Module, ModuleRegistry};

struct Journaled {
    journal: Arc<Mutex<Vec<&'static str>>>,
}

#[async_trait]
impl Module for Journaled {
    fn name(&self) -> &'static str {
        "journal"
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.journal.lock().unwrap().push("start");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.journal.lock().unwrap().push("stop");
        Ok(())
    }
}

#[tokio::test]
async fn modules_stop_after_graceful_shutdown() {
    let journal = Arc::new(Mutex::new(Vec::new()));
    let mut registry = ModuleRegistry::new();
    registry
        .register(Arc::new(Journaled {
            journal: journal.clone(),
        }))
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let shutdown = async {
        let _ = rx.await;
    };

    let served = tokio::spawn(async move {
        shelfwise_app::serve_registry(&registry, &Settings::default(), listener, shutdown).await
    });

    while journal.lock().unwrap().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(*journal.lock().unwrap(), vec!["start"]);

    tx.send(()).unwrap();
    served.await.unwrap().unwrap();

    assert_eq!(*journal.lock().unwrap(), vec!["start", "stop"]);
}
