//! Core data types shared by both nodes

use crate::tick::Tick;

/// Morse symbols accumulated into a sequence
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Short element
    Dot,
    /// Long element
    Dash,
}

impl Symbol {
    /// Character used for this symbol in sequence strings
    pub const fn as_char(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    pub const fn from_char(c: char) -> Option<Symbol> {
        match c {
            '.' => Some(Symbol::Dot),
            '-' => Some(Symbol::Dash),
            _ => None,
        }
    }
}

/// Logical role of an input button
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonRole {
    Dot,
    Dash,
    Send,
    Undo,
    Sos,
    Reset,
}

impl ButtonRole {
    pub const ALL: [ButtonRole; 6] = [
        ButtonRole::Dot,
        ButtonRole::Dash,
        ButtonRole::Send,
        ButtonRole::Undo,
        ButtonRole::Sos,
        ButtonRole::Reset,
    ];

    /// Symbol appended by this button, if it is a symbol button
    pub const fn symbol(&self) -> Option<Symbol> {
        match self {
            ButtonRole::Dot => Some(Symbol::Dot),
            ButtonRole::Dash => Some(Symbol::Dash),
            _ => None,
        }
    }
}

/// Maximum number of button lines a bank may expose
pub const MAX_BUTTON_LINES: usize = 8;

/// Debounced press events from one scan, in line order
pub type ButtonEvents = heapless::Vec<ButtonRole, MAX_BUTTON_LINES>;

/// Injected table binding button lines to roles
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ButtonMap {
    roles: [Option<ButtonRole>; MAX_BUTTON_LINES],
}

impl ButtonMap {
    /// Map with no bound lines
    pub const fn empty() -> Self {
        Self {
            roles: [None; MAX_BUTTON_LINES],
        }
    }

    /// Build a map from `(line, role)` pairs
    pub fn from_bindings(bindings: &[(usize, ButtonRole)]) -> Result<Self, &'static str> {
        let mut map = Self::empty();
        for &(line, role) in bindings {
            let slot = map
                .roles
                .get_mut(line)
                .ok_or("Button line out of range")?;
            if slot.is_some() {
                return Err("Button line bound twice");
            }
            *slot = Some(role);
        }
        Ok(map)
    }

    pub fn role_of(&self, line: usize) -> Option<ButtonRole> {
        self.roles.get(line).copied().flatten()
    }

    pub fn line_of(&self, role: ButtonRole) -> Option<usize> {
        self.roles.iter().position(|bound| *bound == Some(role))
    }

    /// Bound lines in ascending order
    pub fn bindings(&self) -> impl Iterator<Item = (usize, ButtonRole)> + '_ {
        self.roles
            .iter()
            .enumerate()
            .filter_map(|(line, role)| role.map(|role| (line, role)))
    }
}

impl Default for ButtonMap {
    /// Lines 0..6 bound to Dot, Dash, Send, Undo, SOS, Reset
    fn default() -> Self {
        let mut map = Self::empty();
        for (line, role) in ButtonRole::ALL.iter().enumerate() {
            map.roles[line] = Some(*role);
        }
        map
    }
}

/// SOS lifecycle shared by both nodes
///
/// The input node only uses `Idle`/`Pending`, the display node only
/// `Idle`/`Active`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SosState {
    Idle,
    /// Armed on the input node, waiting out the send delay
    Pending(Tick),
    /// Alarm raised on the display node; left only on reset
    Active(Tick),
}

impl SosState {
    pub const fn is_idle(&self) -> bool {
        matches!(self, SosState::Idle)
    }

    /// Tick the current non-idle state began
    pub const fn since(&self) -> Option<Tick> {
        match self {
            SosState::Idle => None,
            SosState::Pending(start) | SosState::Active(start) => Some(*start),
        }
    }
}
