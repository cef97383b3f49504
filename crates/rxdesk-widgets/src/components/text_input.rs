//! Single-line text input component

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use rxdesk_focus::{FocusManager, FocusableId, ScopeId, TabStopRevertPolicy};

use super::FocusHandle;
use crate::native::WidgetKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInputProps {
    pub placeholder: String,
    pub editable: bool,
    pub max_length: Option<usize>,
}

impl Default for TextInputProps {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            editable: true,
            max_length: None,
        }
    }
}

#[derive(Debug)]
pub struct TextInput {
    props: TextInputProps,
    value: String,
    focus: FocusHandle,
}

impl TextInput {
    pub fn new(props: TextInputProps) -> Self {
        let focus = FocusHandle::new(WidgetKind::TextInput, props.editable, Some(0));
        Self {
            props,
            value: String::new(),
            focus,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
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

    /// Edit the value while focused; returns whether the key was consumed
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !self.props.editable || !self.focus.has_focus() {
            return false;
        }
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                if self
                    .props
                    .max_length
                    .is_some_and(|max| self.value.chars().count() >= max)
                {
                    return true;
                }
                self.value.push(c);
                true
            }
            KeyCode::Backspace => {
                self.value.pop();
                true
            }
            _ => false,
        }
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = if self.value.is_empty() {
            self.props.placeholder.as_str()
        } else {
            self.value.as_str()
        };
        Paragraph::new(text)
            .style(self.focus.style(!self.props.editable))
            .block(Block::default().borders(Borders::ALL))
            .render(area, buf);
    }
}
