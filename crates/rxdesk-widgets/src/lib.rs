//! Terminal widget adapters for RxDesk
//!
//! Maps the cross-platform component surface (buttons, links, text inputs,
//! views, scroll views) onto ratatui widgets and crossterm input, and wires
//! each focusable component into an [`rxdesk_focus::FocusManager`] through the
//! element adapter contract.

pub mod components;
pub mod event;
pub mod native;
pub mod root_view;

pub use components::{
    Button, ButtonProps, FocusHandle, Link, LinkProps, ScrollView, TextInput, TextInputProps,
    View, ViewProps,
};
pub use event::{normalize_key_code, KeyboardEvent, UiEvent};
pub use native::{NativeFocusState, NativeFocusable, NativeHandle, WidgetKind};
pub use root_view::{EventOutcome, RootView};
