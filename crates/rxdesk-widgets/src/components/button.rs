//! Button component

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use rxdesk_focus::{FocusManager, FocusableId, ScopeId, TabStopRevertPolicy};

use super::FocusHandle;
use crate::native::WidgetKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonProps {
    pub title: String,
    pub disabled: bool,
    pub tab_index: i32,
}

impl ButtonProps {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            disabled: false,
            tab_index: 0,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = tab_index;
        self
    }

    fn is_tab_stop(&self) -> bool {
        !self.disabled && self.tab_index >= 0
    }
}

#[derive(Debug)]
pub struct Button {
    props: ButtonProps,
    focus: FocusHandle,
}

impl Button {
    pub fn new(props: ButtonProps) -> Self {
        let focus = FocusHandle::new(WidgetKind::Button, props.is_tab_stop(), Some(props.tab_index));
        Self { props, focus }
    }

    pub fn props(&self) -> &ButtonProps {
        &self.props
    }

    pub fn set_props(&mut self, props: ButtonProps) {
        self.focus.set_props(props.is_tab_stop(), Some(props.tab_index));
        self.props = props;
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

    /// Pressing a disabled button does nothing
    pub fn press(&self) -> bool {
        !self.props.disabled
    }
}

impl Widget for &Button {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.props.title.as_str())
            .style(self.focus.style(self.props.disabled))
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
    }
}
