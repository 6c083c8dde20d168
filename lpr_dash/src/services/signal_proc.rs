use log::{error, info};
use signal_hook::consts::signal::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use tokio::sync::watch::{Receiver, Sender};
use tokio::task::JoinHandle as TkJoinHandle;

use crate::error::AppResult;
use crate::services::{EXIT_SIGNAL, Service};

pub struct SignalProcSvc {
    tx: Sender<i64>,
    signals: Signals,
}

impl SignalProcSvc {
    pub fn new(tx: Sender<i64>) -> AppResult<Self> {
        let signals = Signals::new(&[SIGTERM, SIGINT, SIGQUIT])?;

        Ok(SignalProcSvc {
            tx,
            signals,
        })
    }
}

impl Service for SignalProcSvc {
    fn run(self, _rx: Receiver<i64>) -> TkJoinHandle<()> {
        let mut signals = self.signals;
        let tx = self.tx;

        tokio::task::spawn_blocking(move || {
            if let Some(sig) = signals.forever().next() {
                info!("SignalProcSvc catch signal: {}, broadcast exit", sig);
            }
            if let Err(e) = tx.send(EXIT_SIGNAL) {
                error!("error, SignalProcSvc, send exit, {:?}", e);
            }
            info!("SignalProcSvc exit.");
        })
    }
}
