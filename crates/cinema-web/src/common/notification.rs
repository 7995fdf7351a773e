use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dominator::{html, Dom, DomHandle};
use futures::future::{abortable, AbortHandle};
use futures_signals::signal::{Mutable, SignalExt};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::config::{self, NotificationTiming};
use crate::utils::{body, remove_all};

const NOTIFICATION_CLASS: &str = "notification";

thread_local! {
    static CURRENT: RefCell<Registry<Shown>> = const { RefCell::new(Registry::new()) };
}

pub fn show_success(message: &str) {
    show(message, NotificationKind::Success);
}

pub fn show_error(message: &str) {
    show(message, NotificationKind::Error);
}

/// Replaces whatever notification is on screen with a new one.
pub fn show(message: &str, kind: NotificationKind) {
    dismiss();

    let timing = config::get().notification;
    let notification = Notification::new(message, kind);
    let id = notification.id;

    let handle = dominator::append_dom(&body(), Notification::render(notification.clone()));
    let (lifecycle, abort) = abortable(Notification::run(notification, timing));

    let evicted = CURRENT.with(|c| {
        c.borrow_mut().replace(
            id,
            Shown {
                handle,
                lifecycle: abort,
            },
        )
    });
    if let Some(evicted) = evicted {
        evicted.discard();
    }

    spawn_local(async move {
        // aborted when a newer notification evicted this one
        if lifecycle.await.is_ok() {
            remove(id);
        }
    });
}

/// Removes the current notification and any stray `.notification` node.
pub fn dismiss() {
    if let Some(shown) = CURRENT.with(|c| c.borrow_mut().take()) {
        shown.discard();
    }

    if let Err(e) = remove_all(&format!(".{}", NOTIFICATION_CLASS)) {
        warn!("{}", e);
    }
}

fn remove(id: usize) {
    if let Some(shown) = CURRENT.with(|c| c.borrow_mut().take_if_current(id)) {
        shown.handle.discard();
    }
}

struct Shown {
    handle: DomHandle,
    lifecycle: AbortHandle,
}

impl Shown {
    fn discard(self) {
        self.lifecycle.abort();
        self.handle.discard();
    }
}

/// Tracks the single notification on screen by id.
struct Registry<H> {
    current: Option<(usize, H)>,
}

impl<H> Registry<H> {
    const fn new() -> Self {
        Self { current: None }
    }

    fn current_id(&self) -> Option<usize> {
        self.current.as_ref().map(|(id, _)| *id)
    }

    /// Installs `handle` as current, handing back the one it evicts.
    fn replace(&mut self, id: usize, handle: H) -> Option<H> {
        self.current.replace((id, handle)).map(|(_, evicted)| evicted)
    }

    fn take(&mut self) -> Option<H> {
        self.current.take().map(|(_, handle)| handle)
    }

    /// Takes the handle only while `id` is still the one on screen.
    fn take_if_current(&mut self, id: usize) -> Option<H> {
        if self.current_id() == Some(id) {
            self.take()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Success,
    Error,
}

impl NotificationKind {
    pub fn class_name(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        }
    }

    pub fn background(self) -> &'static str {
        match self {
            NotificationKind::Success => "#10b981",
            NotificationKind::Error => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Leaving,
}

impl Phase {
    pub fn transform(self) -> &'static str {
        match self {
            Phase::Entering | Phase::Leaving => "translateX(100%)",
            Phase::Visible => "translateX(0)",
        }
    }

    /// Phase `elapsed` milliseconds after creation, `None` once removed.
    pub fn at(elapsed: u32, timing: &NotificationTiming) -> Option<Self> {
        if elapsed < timing.enter_delay {
            Some(Phase::Entering)
        } else if elapsed < timing.display {
            Some(Phase::Visible)
        } else if elapsed < timing.lifetime() {
            Some(Phase::Leaving)
        } else {
            None
        }
    }
}

pub struct Notification {
    id: usize,
    message: String,
    kind: NotificationKind,
    phase: Mutable<Phase>,
}

impl Notification {
    pub fn new(message: &str, kind: NotificationKind) -> Rc<Self> {
        static ID: AtomicUsize = AtomicUsize::new(0);

        Rc::new(Self {
            id: ID.fetch_add(1, Ordering::SeqCst),
            message: message.to_string(),
            kind,
            phase: Mutable::new(Phase::Entering),
        })
    }

    async fn run(notification: Rc<Self>, timing: NotificationTiming) {
        let waits = [
            timing.enter_delay,
            timing.display.saturating_sub(timing.enter_delay),
            timing.exit,
        ];

        let mut elapsed = 0;
        for wait in waits {
            TimeoutFuture::new(wait).await;
            elapsed = elapsed.saturating_add(wait);

            match Phase::at(elapsed, &timing) {
                Some(phase) => notification.phase.set_neq(phase),
                None => break,
            }
        }
    }

    pub fn render(notification: Rc<Self>) -> Dom {
        html!("div", {
            .class(NOTIFICATION_CLASS)
            .class(notification.kind.class_name())
            .style("position", "fixed")
            .style("top", "20px")
            .style("right", "20px")
            .style("background", notification.kind.background())
            .style("color", "white")
            .style("padding", "12px 20px")
            .style("border-radius", "8px")
            .style("z-index", "10000")
            .style("box-shadow", "0 4px 12px rgba(0,0,0,0.15)")
            .style("transition", "all 0.3s ease")
            .style_signal("transform", notification.phase.signal().map(Phase::transform))
            .text(&notification.message)
        })
    }
}
