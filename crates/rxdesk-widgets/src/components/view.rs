//! View and ScrollView containers
//!
//! A view that asks for focus restriction or limitation owns a focus scope
//! while mounted; children mount into [`View::child_scope`].

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Widget};
use rxdesk_focus::{FocusManager, FocusResult, FocusableId, LimitFocusType, ScopeId};

use super::FocusHandle;
use crate::native::WidgetKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewProps {
    pub title: Option<String>,
    /// Makes the view itself focusable
    pub tab_index: Option<i32>,
    /// Trap focus within the view while mounted
    pub restrict_focus_within: bool,
    pub limit_focus_within: LimitFocusType,
}

impl ViewProps {
    fn needs_scope(&self) -> bool {
        self.restrict_focus_within || self.limit_focus_within != LimitFocusType::Unlimited
    }
}

#[derive(Debug)]
pub struct View {
    props: ViewProps,
    focus: FocusHandle,
    parent_scope: Option<ScopeId>,
    scope: Option<ScopeId>,
}

impl View {
    pub fn new(props: ViewProps) -> Self {
        let tab_stop = props.tab_index.is_some_and(|t| t >= 0);
        let focus = FocusHandle::new(WidgetKind::View, tab_stop, props.tab_index);
        Self {
            props,
            focus,
            parent_scope: None,
            scope: None,
        }
    }

    pub fn props(&self) -> &ViewProps {
        &self.props
    }

    pub fn focus_handle(&self) -> &FocusHandle {
        &self.focus
    }

    pub fn id(&self) -> Option<FocusableId> {
        self.focus.id()
    }

    /// Scope owned by this view, if it requested one
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    /// Scope children of this view register under
    pub fn child_scope(&self) -> Option<ScopeId> {
        self.scope.or(self.parent_scope)
    }

    /// Mount under `parent`, creating and activating the view's scope when its
    /// props ask for one. A focusable view registers inside its own scope so
    /// restricting or limiting it never demotes the view itself.
    pub fn mount(&mut self, manager: &mut FocusManager, parent: Option<ScopeId>) -> FocusResult<()> {
        self.parent_scope = parent;
        if self.props.needs_scope() && self.scope.is_none() {
            let scope = manager.create_scope(parent)?;
            self.scope = Some(scope);
            if self.props.limit_focus_within != LimitFocusType::Unlimited {
                manager.limit_focus_within(scope, self.props.limit_focus_within)?;
            }
        }
        if self.props.tab_index.is_some() {
            self.focus.mount(manager, self.child_scope());
        }
        Ok(())
    }

    /// Create the view's scope after mount and move the view's own
    /// registration into it
    fn ensure_scope(&mut self, manager: &mut FocusManager) -> FocusResult<ScopeId> {
        if let Some(scope) = self.scope {
            return Ok(scope);
        }
        let scope = manager.create_scope(self.parent_scope)?;
        self.scope = Some(scope);
        if self.focus.is_mounted() {
            self.focus.unmount(manager);
            self.focus.mount(manager, Some(scope));
        }
        Ok(scope)
    }

    /// Activate props-driven restriction once children are mounted
    pub fn did_mount_children(&mut self, manager: &mut FocusManager) -> FocusResult<()> {
        if let (true, Some(scope)) = (self.props.restrict_focus_within, self.scope) {
            manager.restrict_focus_within(scope, false)?;
        }
        Ok(())
    }

    /// Toggle restriction of a mounted view
    pub fn set_restrict_focus_within(
        &mut self,
        manager: &mut FocusManager,
        restrict: bool,
    ) -> FocusResult<()> {
        self.props.restrict_focus_within = restrict;
        let scope = match self.scope {
            Some(scope) => scope,
            None if restrict => self.ensure_scope(manager)?,
            None => return Ok(()),
        };
        if restrict {
            manager.restrict_focus_within(scope, false)
        } else {
            manager.remove_focus_restriction(scope)
        }
    }

    /// Toggle limitation of a mounted view
    pub fn set_limit_focus_within(
        &mut self,
        manager: &mut FocusManager,
        limit: LimitFocusType,
    ) -> FocusResult<()> {
        self.props.limit_focus_within = limit;
        let scope = match self.scope {
            Some(scope) => scope,
            None if limit != LimitFocusType::Unlimited => self.ensure_scope(manager)?,
            None => return Ok(()),
        };
        manager.remove_focus_limitation(scope)?;
        manager.limit_focus_within(scope, limit)
    }

    pub fn unmount(&mut self, manager: &mut FocusManager) -> FocusResult<()> {
        self.focus.unmount(manager);
        if let Some(scope) = self.scope.take() {
            manager.release_scope(scope)?;
        }
        Ok(())
    }
}

impl Widget for &View {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.focus.style(false));
        if let Some(title) = &self.props.title {
            block = block.title(title.as_str());
        }
        block.render(area, buf);
    }
}

/// Scrollable view; focus behavior is the wrapped view's
#[derive(Debug)]
pub struct ScrollView {
    view: View,
    offset: u16,
    content_height: u16,
}

impl ScrollView {
    pub fn new(props: ViewProps, content_height: u16) -> Self {
        Self {
            view: View::new(props),
            offset: 0,
            content_height,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    /// Scroll by `delta` rows, clamped to the content
    pub fn scroll_by(&mut self, delta: i32, viewport_height: u16) {
        let max = self.content_height.saturating_sub(viewport_height) as i32;
        self.offset = (self.offset as i32 + delta).clamp(0, max) as u16;
    }

    pub fn mount(&mut self, manager: &mut FocusManager, parent: Option<ScopeId>) -> FocusResult<()> {
        self.view.mount(manager, parent)
    }

    pub fn unmount(&mut self, manager: &mut FocusManager) -> FocusResult<()> {
        self.view.unmount(manager)
    }
}

impl Widget for &ScrollView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        (&self.view).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Button, ButtonProps};
    use rxdesk_focus::{KeyboardNavigationEvent, OverrideType};

    #[test]
    fn test_restricting_view_traps_children() {
        let mut manager = FocusManager::new(KeyboardNavigationEvent::new());
        let mut page = Button::new(ButtonProps::new("Page"));
        let page_id = page.mount(&mut manager, None);

        let mut dialog = View::new(ViewProps {
            restrict_focus_within: true,
            ..ViewProps::default()
        });
        dialog.mount(&mut manager, None).unwrap();
        let mut ok = Button::new(ButtonProps::new("OK"));
        let ok_id = ok.mount(&mut manager, dialog.child_scope());
        dialog.did_mount_children(&mut manager).unwrap();

        assert_eq!(manager.override_of(page_id), Some(OverrideType::Limited));
        assert!(!page.focus_handle().is_tab_stop());
        assert!(ok.focus_handle().is_tab_stop());
        assert_eq!(manager.eligible(), vec![ok_id]);

        ok.unmount(&mut manager);
        dialog.unmount(&mut manager).unwrap();
        assert!(page.focus_handle().is_tab_stop());
    }

    #[test]
    fn test_limit_toggle() {
        let mut manager = FocusManager::new(KeyboardNavigationEvent::new());
        let mut sidebar = View::new(ViewProps::default());
        sidebar.mount(&mut manager, None).unwrap();
        assert!(sidebar.scope().is_none());

        sidebar
            .set_limit_focus_within(&mut manager, LimitFocusType::Accessible)
            .unwrap();
        let mut item = Button::new(ButtonProps::new("Item"));
        let id = item.mount(&mut manager, sidebar.child_scope());
        assert_eq!(manager.override_of(id), Some(OverrideType::Accessible));

        sidebar
            .set_limit_focus_within(&mut manager, LimitFocusType::Unlimited)
            .unwrap();
        assert_eq!(manager.override_of(id), Some(OverrideType::None));
    }

    #[test]
    fn test_focusable_restricting_view_stays_eligible() {
        let mut manager = FocusManager::new(KeyboardNavigationEvent::new());
        let mut page = Button::new(ButtonProps::new("Page"));
        let page_id = page.mount(&mut manager, None);

        let mut dialog = View::new(ViewProps {
            tab_index: Some(0),
            restrict_focus_within: true,
            ..ViewProps::default()
        });
        dialog.mount(&mut manager, None).unwrap();
        let dialog_id = dialog.id().unwrap();
        dialog.did_mount_children(&mut manager).unwrap();

        assert_eq!(manager.override_of(dialog_id), Some(OverrideType::None));
        assert_eq!(manager.override_of(page_id), Some(OverrideType::Limited));
        assert!(dialog.focus_handle().is_tab_stop());
        assert_eq!(manager.eligible(), vec![dialog_id]);
    }

    #[test]
    fn test_late_restriction_moves_view_into_its_scope() {
        let mut manager = FocusManager::new(KeyboardNavigationEvent::new());
        let mut page = Button::new(ButtonProps::new("Page"));
        let page_id = page.mount(&mut manager, None);

        let mut panel = View::new(ViewProps {
            tab_index: Some(0),
            ..ViewProps::default()
        });
        panel.mount(&mut manager, None).unwrap();
        assert!(panel.scope().is_none());

        panel.set_restrict_focus_within(&mut manager, true).unwrap();
        let panel_id = panel.id().unwrap();
        assert_eq!(manager.override_of(panel_id), Some(OverrideType::None));
        assert_eq!(manager.override_of(page_id), Some(OverrideType::Limited));
        assert_eq!(manager.eligible(), vec![panel_id]);
    }

    #[test]
    fn test_scroll_clamps() {
        let mut scroll = ScrollView::new(ViewProps::default(), 10);
        scroll.scroll_by(20, 4);
        assert_eq!(scroll.offset(), 6);
        scroll.scroll_by(-100, 4);
        assert_eq!(scroll.offset(), 0);
    }
}
