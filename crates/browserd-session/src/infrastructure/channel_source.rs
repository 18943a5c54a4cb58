//! A [`PointerSource`] fed from a channel, for surfaces that push presses
//! from another task (a UI event loop, a test).

use async_trait::async_trait;
use browserd_core::protocol::encoder::{PointerPress, SurfaceOrigin};
use tokio::sync::mpsc;

use crate::application::consumer_app::PointerSource;

pub type PressSender = mpsc::UnboundedSender<(PointerPress, SurfaceOrigin)>;

pub struct ChannelPointerSource {
    rx: mpsc::UnboundedReceiver<(PointerPress, SurfaceOrigin)>,
}

impl ChannelPointerSource {
    /// Returns the source and the sender that feeds it. The source is
    /// exhausted once every sender is dropped.
    pub fn new() -> (Self, PressSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx }, tx)
    }
}

#[async_trait]
impl PointerSource for ChannelPointerSource {
    async fn next_press(&mut self) -> Option<(PointerPress, SurfaceOrigin)> {
        self.rx.recv().await
    }
}
