use std::{
    cell::RefCell,
    fmt::Display,
    rc::Rc,
    sync::mpsc::{self, Receiver, Sender},
};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    Light,
    Dark,
}
impl DisplayMode {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark { Self::Dark } else { Self::Light }
    }
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
    pub fn visuals(self) -> egui::Visuals {
        match self {
            Self::Dark => egui::Visuals::dark(),
            Self::Light => egui::Visuals::light(),
        }
    }
}
impl From<egui::Theme> for DisplayMode {
    fn from(theme: egui::Theme) -> Self {
        match theme {
            egui::Theme::Dark => Self::Dark,
            egui::Theme::Light => Self::Light,
        }
    }
}
impl Display for DisplayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dark => f.write_str("dark"),
            Self::Light => f.write_str("light"),
        }
    }
}

/// Registration of a listener for preference changes. Dropping it deregisters the listener.
pub struct Subscription {
    receiver: Receiver<DisplayMode>,
    unsubscribe: Option<Box<dyn FnOnce()>>,
}
impl Subscription {
    pub fn new(receiver: Receiver<DisplayMode>, unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            receiver,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
    /// Most recent notification since the last call, if any
    pub fn latest(&self) -> Option<DisplayMode> {
        self.receiver.try_iter().last()
    }
}
impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// Capability to observe the color-scheme preference of the host environment.
pub trait ColorSchemeSource {
    fn current(&self) -> DisplayMode;
    fn subscribe(&self) -> Subscription;
}

#[derive(Default)]
struct WatcherState {
    current: DisplayMode,
    next_id: usize,
    listeners: Vec<(usize, Sender<DisplayMode>)>,
}

/// Host-side preference holder. Clones share their state.
#[derive(Clone, Default)]
pub struct ColorSchemeWatcher {
    state: Rc<RefCell<WatcherState>>,
}
impl ColorSchemeWatcher {
    pub fn new(initial: DisplayMode) -> Self {
        Self {
            state: Rc::new(RefCell::new(WatcherState {
                current: initial,
                ..WatcherState::default()
            })),
        }
    }
    /// Notifies all listeners if the preference actually changed.
    pub fn set(&self, mode: DisplayMode) {
        let mut state = self.state.borrow_mut();
        if state.current != mode {
            debug!("color scheme preference changed to {mode}");
            state.current = mode;
            state.listeners.retain(|(_, tx)| tx.send(mode).is_ok());
        }
    }
    pub fn n_listeners(&self) -> usize {
        self.state.borrow().listeners.len()
    }
    /// A mode forced by the user config wins over the system theme reported by egui.
    pub fn update_from_egui(&self, ctx: &egui::Context, forced: Option<DisplayMode>) {
        let mode = forced.or_else(|| ctx.system_theme().map(DisplayMode::from));
        if let Some(mode) = mode {
            self.set(mode);
        }
    }
}
impl ColorSchemeSource for ColorSchemeWatcher {
    fn current(&self) -> DisplayMode {
        self.state.borrow().current
    }
    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, tx));
            id
        };
        let state = Rc::downgrade(&self.state);
        Subscription::new(rx, move || {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().listeners.retain(|(lid, _)| *lid != id);
            }
        })
    }
}

#[test]
fn test_watcher_notifies() {
    let watcher = ColorSchemeWatcher::new(DisplayMode::Light);
    let sub = watcher.subscribe();
    assert_eq!(watcher.n_listeners(), 1);
    assert_eq!(sub.latest(), None);
    watcher.set(DisplayMode::Light);
    assert_eq!(sub.latest(), None);
    watcher.set(DisplayMode::Dark);
    watcher.set(DisplayMode::Light);
    watcher.set(DisplayMode::Dark);
    assert_eq!(sub.latest(), Some(DisplayMode::Dark));
    assert_eq!(sub.latest(), None);
    assert_eq!(watcher.current(), DisplayMode::Dark);
}

#[test]
fn test_drop_deregisters() {
    let watcher = ColorSchemeWatcher::default();
    let sub_1 = watcher.subscribe();
    let sub_2 = watcher.clone().subscribe();
    assert_eq!(watcher.n_listeners(), 2);
    drop(sub_1);
    assert_eq!(watcher.n_listeners(), 1);
    watcher.set(DisplayMode::Dark);
    assert_eq!(sub_2.latest(), Some(DisplayMode::Dark));
    // outliving the source is fine
    drop(watcher);
    drop(sub_2);
}

#[test]
fn test_forced_mode_wins() {
    let watcher = ColorSchemeWatcher::new(DisplayMode::Light);
    let ctx = egui::Context::default();
    watcher.update_from_egui(&ctx, Some(DisplayMode::Dark));
    assert_eq!(watcher.current(), DisplayMode::Dark);
    assert_eq!(DisplayMode::from(egui::Theme::Light), DisplayMode::Light);
    assert!(DisplayMode::from_is_dark(true).is_dark());
    assert_eq!(DisplayMode::Dark.to_string(), "dark");
}
