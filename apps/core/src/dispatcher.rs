//! Routes each input event to exactly one active processor and layers
//! uniform history handling around processors that keep history.

use crate::history::HistManager;
use crate::processor::{HotkeyKind, Processor, ProcessorInput, ProcessorOutput, SubProcessor};

/// Implemented by processors that own a history manager, so the history
/// wrapper can drive the cursor the processor itself navigates with.
pub trait HistoryHolder {
    fn history(&self) -> &HistManager;
    fn history_mut(&mut self) -> &mut HistManager;
}

/// Explicit composition wrapper that handles history around an inner
/// processor's update: resets the cursor after show/activate, intercepts the
/// Prev/Next hotkeys with recalled commands, and records commits.
pub struct HistoryAware<P> {
    inner: P,
}

impl<P: Processor + HistoryHolder> HistoryAware<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut P {
        &mut self.inner
    }
}

impl<P: Processor + HistoryHolder> Processor for HistoryAware<P> {
    fn help_text(&self) -> String {
        self.inner.help_text()
    }

    fn on_activate(&mut self, input: &ProcessorInput) {
        self.inner.on_activate(input);
    }

    fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        if input.was_hidden || input.was_activated {
            self.inner.history_mut().reset();
        }
        if input.event.is_hotkey(HotkeyKind::Prev) {
            let mut out = ProcessorOutput::default();
            out.cmd_text = self.inner.history_mut().get_prev_cmd(&input.cmd);
            return Some(out);
        }
        if input.event.is_hotkey(HotkeyKind::Next) {
            let mut out = ProcessorOutput::default();
            out.cmd_text = self.inner.history_mut().get_next_cmd(&input.cmd);
            return Some(out);
        }
        if input.is_complete && !input.cmd.is_empty() {
            self.inner.history_mut().add(input);
        }
        self.inner.update(input)
    }
}

impl<P: SubProcessor + HistoryHolder> SubProcessor for HistoryAware<P> {
    fn claims_input(&mut self, input: &ProcessorInput) -> bool {
        self.inner.claims_input(input)
    }
}

struct Slot {
    sub: Box<dyn SubProcessor>,
    is_active: bool,
}

/// Two-level single-active-handler state machine over a root processor and
/// an ordered list of sub-processors. The first sub-processor claiming the
/// input handles it; otherwise the root does. Activation transitions are
/// derived purely from claim evaluation.
pub struct Dispatcher<R> {
    root: R,
    root_active: bool,
    subs: Vec<Slot>,
}

impl<R: Processor> Dispatcher<R> {
    pub fn new(root: R, subs: Vec<Box<dyn SubProcessor>>) -> Self {
        Self {
            root,
            root_active: false,
            subs: subs
                .into_iter()
                .map(|sub| Slot {
                    sub,
                    is_active: false,
                })
                .collect(),
        }
    }

    pub fn root(&self) -> &R {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut R {
        &mut self.root
    }

    pub fn help_text(&self) -> String {
        let mut help = self.root.help_text();
        for slot in &self.subs {
            if !help.ends_with('\n') {
                help.push('\n');
            }
            help.push_str(&slot.sub.help_text());
        }
        help
    }

    /// Clears all transient activation flags; called when the shell hides.
    pub fn reset_activation(&mut self) {
        self.root_active = false;
        for slot in &mut self.subs {
            slot.is_active = false;
        }
    }

    pub fn update(&mut self, input: &ProcessorInput) -> Option<ProcessorOutput> {
        let mut input = input.clone();

        let mut active = None;
        for (index, slot) in self.subs.iter_mut().enumerate() {
            if active.is_none() && slot.sub.claims_input(&input) {
                active = Some(index);
            } else {
                slot.is_active = false;
            }
        }

        if let Some(index) = active {
            self.root_active = false;
            let slot = &mut self.subs[index];
            input.was_activated = !slot.is_active;
            if input.was_activated {
                slot.sub.on_activate(&input);
                input.selected_row = Some(0);
            }
            slot.is_active = true;
            return slot.sub.update(&input);
        }

        input.was_activated = !self.root_active;
        if input.was_activated {
            self.root.on_activate(&input);
            input.selected_row = Some(0);
        }
        self.root_active = true;
        self.root.update(&input)
    }
}
