use std::fmt;

/// Keyboard key identifier.
///
/// Covers the keys text editing and menu navigation react to. Anything else
/// arrives as `Key::Unknown(u32)` with a stable host code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    /// Host-dependent key not represented here.
    Unknown(u32),
}

impl Key {
    /// Lower-case letter for letter keys, used for menu underscore mnemonics.
    pub fn to_char(self) -> Option<char> {
        use Key::*;
        let c = match self {
            A => 'a', B => 'b', C => 'c', D => 'd', E => 'e', F => 'f', G => 'g',
            H => 'h', I => 'i', J => 'j', K => 'k', L => 'l', M => 'm', N => 'n',
            O => 'o', P => 'p', Q => 'q', R => 'r', S => 's', T => 't', U => 'u',
            V => 'v', W => 'w', X => 'x', Y => 'y', Z => 'z',
            Space => ' ',
            _ => return None,
        };
        Some(c)
    }
}

/// Modifier keys state.
///
/// Stored as booleans rather than bitflags to keep it explicit and stable.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false };
    pub const CTRL: Modifiers = Modifiers { shift: false, ctrl: true, alt: false };

    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
