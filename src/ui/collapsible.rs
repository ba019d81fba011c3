//! Collapsible container.
//!
//! [`Collapsible`] watches an externally owned `expand` flag and runs exactly
//! one of two hooks each time the flag takes a new value, including the first
//! value it sees. Both hooks are unset by default. [`CollapsibleView`] always
//! draws its child; showing or hiding it is left to the hooks.

use ratatui::prelude::*;
use ratatui::widgets::Block;
use std::fmt;

type Hook = Box<dyn FnMut()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Expand,
    Collapse,
}

#[derive(Default)]
pub struct Collapsible {
    observed: Option<bool>,
    on_expand: Option<Hook>,
    on_collapse: Option<Hook>,
}

impl fmt::Debug for Collapsible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collapsible")
            .field("observed", &self.observed)
            .field("on_expand", &self.on_expand.is_some())
            .field("on_collapse", &self.on_collapse.is_some())
            .finish()
    }
}

impl Collapsible {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_expand(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_expand = Some(Box::new(hook));
        self
    }

    pub fn on_collapse(mut self, hook: impl FnMut() + 'static) -> Self {
        self.on_collapse = Some(Box::new(hook));
        self
    }

    /// Last value seen by [`observe`](Self::observe).
    pub fn observed(&self) -> Option<bool> {
        self.observed
    }

    /// Feed the current `expand` value. Returns the transition that ran, or
    /// `None` when the value is the same as last time.
    pub fn observe(&mut self, expand: bool) -> Option<Transition> {
        if self.observed == Some(expand) {
            return None;
        }
        self.observed = Some(expand);

        if expand {
            if let Some(hook) = self.on_expand.as_mut() {
                hook();
            }
            Some(Transition::Expand)
        } else {
            if let Some(hook) = self.on_collapse.as_mut() {
                hook();
            }
            Some(Transition::Collapse)
        }
    }
}

/// Wrapper that draws an optional block and its child inside it.
pub struct CollapsibleView<'a, W> {
    child: W,
    block: Option<Block<'a>>,
    style: Style,
}

impl<'a, W: Widget> CollapsibleView<'a, W> {
    pub fn new(child: W) -> Self {
        Self {
            child,
            block: None,
            style: Style::default(),
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl<W: Widget> Widget for CollapsibleView<'_, W> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.style);
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        self.child.render(inner, buf);
    }
}
