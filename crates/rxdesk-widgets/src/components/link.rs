//! Link component

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::{Paragraph, Widget};
use rxdesk_focus::{FocusManager, FocusableId, ScopeId, TabStopRevertPolicy};

use super::FocusHandle;
use crate::native::WidgetKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkProps {
    pub text: String,
    pub url: String,
    pub tab_index: i32,
}

impl LinkProps {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
            tab_index: 0,
        }
    }
}

#[derive(Debug)]
pub struct Link {
    props: LinkProps,
    focus: FocusHandle,
}

impl Link {
    pub fn new(props: LinkProps) -> Self {
        let focus = FocusHandle::new(WidgetKind::Link, props.tab_index >= 0, Some(props.tab_index));
        Self { props, focus }
    }

    pub fn props(&self) -> &LinkProps {
        &self.props
    }

    /// Use `policy` for programmatic focus of a non-tab-stop; call before mounting
    pub fn with_revert_policy(mut self, policy: TabStopRevertPolicy) -> Self {
        self.focus = self.focus.with_policy(policy);
        self
    }

    pub fn focus_handle(&self) -> &FocusHandle {
        &self.focus
    }

    pub fn mount(&mut self, manager: &mut FocusManager, scope: Option<ScopeId>) -> FocusableId {
        self.focus.mount(manager, scope)
    }

    pub fn unmount(&mut self, manager: &mut FocusManager) {
        self.focus.unmount(manager);
    }

    pub fn id(&self) -> Option<FocusableId> {
        self.focus.id()
    }

    /// Target to open on activation
    pub fn activate(&self) -> &str {
        &self.props.url
    }
}

impl Widget for &Link {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.props.text.as_str())
            .style(self.focus.style(false).add_modifier(Modifier::UNDERLINED))
            .render(area, buf);
    }
}
