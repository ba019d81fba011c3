use crate::config::AppConfig;
use crate::router::{self, Router};
use crate::ui::collapsible::Collapsible;
use crate::ui::input::InputControl;
use crate::views::View;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    /// Keys go to the routed view.
    Content,
    /// Keys go to the address bar in the top bar.
    AddressBar,
}

/// State owned by the home view.
#[derive(Debug, Default)]
pub struct HomeState {
    pub draft: String,
    pub entries: Vec<String>,
    pub expanded: bool,
}

impl HomeState {
    /// Move the draft into the entries list. Blank drafts are discarded.
    pub fn submit_draft(&mut self) -> bool {
        let draft = std::mem::take(&mut self.draft);
        if draft.trim().is_empty() {
            return false;
        }
        self.entries.push(draft);
        true
    }
}

#[derive(Debug, Default)]
pub struct AddressBar {
    pub value: String,
    pub input: InputControl,
}

pub struct AppState {
    pub config: AppConfig,
    pub router: Router<View>,
    pub focus: Focus,
    pub address: AddressBar,
    pub home: HomeState,
    pub home_input: InputControl,
    pub entries_panel: Collapsible,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let router = router::main_router(&config.router.start_path)?;
        Ok(Self {
            config,
            router,
            focus: Focus::Content,
            address: AddressBar::default(),
            home: HomeState::default(),
            home_input: InputControl::new(),
            entries_panel: Collapsible::new(),
            should_quit: false,
            dirty: true,
        })
    }

    pub fn current_view(&self) -> Option<View> {
        self.router.current_view()
    }

    /// Run watchers whose inputs may have changed since the last event.
    pub fn sync_effects(&mut self) {
        if let Some(transition) = self.entries_panel.observe(self.home.expanded) {
            tracing::debug!(?transition, "Entries panel");
            self.dirty = true;
        }
    }

    pub fn open_address_bar(&mut self) {
        self.address.value = self.router.current_path().to_string();
        self.address.input.move_end(&self.address.value);
        self.focus = Focus::AddressBar;
        self.dirty = true;
    }

    pub fn close_address_bar(&mut self) {
        self.address.value.clear();
        self.focus = Focus::Content;
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        let mut hints = Vec::new();
        if self.router.can_go_back() {
            hints.push("Alt+← back");
        }
        if self.router.can_go_forward() {
            hints.push("Alt+→ forward");
        }
        hints.push("Ctrl+L go to");
        hints.push("Ctrl+Q quit");
        hints.join(" · ")
    }
}
