/// Receives the completion notification of a successful generation run.
pub trait MapObserver {
    fn map_generated(&mut self);
}

/// Observer that ignores the notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MapObserver for NoopObserver {
    fn map_generated(&mut self) {}
}

impl<F: FnMut()> MapObserver for F {
    fn map_generated(&mut self) {
        self()
    }
}
