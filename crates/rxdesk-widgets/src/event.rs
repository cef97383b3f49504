//! Input event normalization
//!
//! Converts crossterm events into [`UiEvent`]s with numeric key codes. Arrow
//! keys arrive with desktop key codes and are mapped onto the mobile codes the
//! component layer expects.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use rxdesk_focus::NavigationInput;

pub const KEY_CODE_TAB: u32 = 9;
pub const KEY_CODE_ENTER: u32 = 13;
pub const KEY_CODE_ESC: u32 = 27;
pub const KEY_CODE_SPACE: u32 = 32;

const KEY_CODE_LEFT: u32 = 21;
const KEY_CODE_UP: u32 = 19;
const KEY_CODE_RIGHT: u32 = 22;
const KEY_CODE_DOWN: u32 = 20;

const DESKTOP_KEY_CODE_LEFT: u32 = 37;
const DESKTOP_KEY_CODE_UP: u32 = 38;
const DESKTOP_KEY_CODE_RIGHT: u32 = 39;
const DESKTOP_KEY_CODE_DOWN: u32 = 40;

/// Map desktop arrow codes to their mobile values; other codes pass through
pub fn normalize_key_code(code: u32) -> u32 {
    match code {
        DESKTOP_KEY_CODE_LEFT => KEY_CODE_LEFT,
        DESKTOP_KEY_CODE_UP => KEY_CODE_UP,
        DESKTOP_KEY_CODE_RIGHT => KEY_CODE_RIGHT,
        DESKTOP_KEY_CODE_DOWN => KEY_CODE_DOWN,
        other => other,
    }
}

fn desktop_key_code(code: &KeyCode) -> Option<u32> {
    let code = match code {
        KeyCode::Tab | KeyCode::BackTab => KEY_CODE_TAB,
        KeyCode::Enter => KEY_CODE_ENTER,
        KeyCode::Esc => KEY_CODE_ESC,
        KeyCode::Backspace => 8,
        KeyCode::Delete => 46,
        KeyCode::Left => DESKTOP_KEY_CODE_LEFT,
        KeyCode::Up => DESKTOP_KEY_CODE_UP,
        KeyCode::Right => DESKTOP_KEY_CODE_RIGHT,
        KeyCode::Down => DESKTOP_KEY_CODE_DOWN,
        KeyCode::Char(' ') => KEY_CODE_SPACE,
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as u32,
        KeyCode::Char(c) => *c as u32,
        _ => return None,
    };
    Some(code)
}

/// Keyboard event with a normalized key code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub key_code: u32,
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Original crossterm event, for components that edit text
    pub raw: KeyEvent,
}

impl KeyboardEvent {
    pub fn from_crossterm(key: KeyEvent) -> Option<Self> {
        let key_code = normalize_key_code(desktop_key_code(&key.code)?);
        Some(Self {
            key_code,
            shift: key.modifiers.contains(KeyModifiers::SHIFT) || key.code == KeyCode::BackTab,
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
            raw: key,
        })
    }

    pub fn is_tab(&self) -> bool {
        self.key_code == KEY_CODE_TAB
    }

    pub fn is_escape(&self) -> bool {
        self.key_code == KEY_CODE_ESC
    }
}

/// Host event after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    KeyDown(KeyboardEvent),
    KeyUp(KeyboardEvent),
    PointerDown { x: u16, y: u16 },
    Resize { width: u16, height: u16 },
    /// Input the component layer does not handle
    Other,
}

impl UiEvent {
    pub fn from_crossterm(event: &Event) -> Self {
        match event {
            Event::Key(key) => match KeyboardEvent::from_crossterm(*key) {
                Some(kbd) if key.kind == KeyEventKind::Release => UiEvent::KeyUp(kbd),
                Some(kbd) => UiEvent::KeyDown(kbd),
                None => UiEvent::Other,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(_) => UiEvent::PointerDown {
                    x: mouse.column,
                    y: mouse.row,
                },
                _ => UiEvent::Other,
            },
            Event::Resize(width, height) => UiEvent::Resize {
                width: *width,
                height: *height,
            },
            _ => UiEvent::Other,
        }
    }

    /// Signal for the keyboard navigation detector, if any.
    ///
    /// Terminals have no touch events, so this never yields
    /// [`NavigationInput::TouchStart`].
    pub fn navigation_input(&self) -> Option<NavigationInput> {
        match self {
            UiEvent::KeyDown(kbd) if kbd.is_tab() => Some(NavigationInput::TabKey),
            UiEvent::KeyDown(kbd) if kbd.is_escape() => Some(NavigationInput::EscapeKey),
            UiEvent::KeyDown(_) => Some(NavigationInput::OtherKey),
            UiEvent::PointerDown { .. } => Some(NavigationInput::PointerDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_normalize_arrow_codes() {
        assert_eq!(normalize_key_code(37), 21);
        assert_eq!(normalize_key_code(38), 19);
        assert_eq!(normalize_key_code(39), 22);
        assert_eq!(normalize_key_code(40), 20);
        assert_eq!(normalize_key_code(9), 9);
    }

    #[test]
    fn test_crossterm_arrow_is_normalized() {
        match UiEvent::from_crossterm(&key(KeyCode::Up, KeyModifiers::NONE)) {
            UiEvent::KeyDown(kbd) => assert_eq!(kbd.key_code, KEY_CODE_UP),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_back_tab_is_shift_tab() {
        match UiEvent::from_crossterm(&key(KeyCode::BackTab, KeyModifiers::NONE)) {
            UiEvent::KeyDown(kbd) => {
                assert!(kbd.is_tab());
                assert!(kbd.shift);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_key_release_is_key_up() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Enter,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(matches!(UiEvent::from_crossterm(&release), UiEvent::KeyUp(_)));
    }

    #[test]
    fn test_navigation_inputs() {
        let tab = UiEvent::from_crossterm(&key(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(tab.navigation_input(), Some(NavigationInput::TabKey));

        let esc = UiEvent::from_crossterm(&key(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(esc.navigation_input(), Some(NavigationInput::EscapeKey));

        let click = UiEvent::from_crossterm(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(click, UiEvent::PointerDown { x: 3, y: 4 });
        assert_eq!(click.navigation_input(), Some(NavigationInput::PointerDown));

        assert_eq!(UiEvent::Resize { width: 1, height: 1 }.navigation_input(), None);
    }

    #[test]
    fn test_every_mouse_press_is_pointer_down() {
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            let press = UiEvent::from_crossterm(&Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(button),
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            }));
            assert_eq!(press.navigation_input(), Some(NavigationInput::PointerDown));
            assert_ne!(press.navigation_input(), Some(NavigationInput::TouchStart));
        }
    }
}
