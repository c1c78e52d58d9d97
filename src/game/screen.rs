//! Screens, click targets and the screen state machine.
//!
//! [`transition`] is the only place that decides what a committed click does. It maps the
//! current [`Screen`] and a [`Trigger`] to an [`Outcome`]; the caller applies the outcome.

use crate::assets::SpriteId;

/// The mutually exclusive UI modes of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    MainMenu,
    SerumSelect,
    MixingSerums,
    /// Planned mixing stages; nothing leads here yet.
    CutHand,
    ShakeVial,
    UseSyringe,
}

/// The button under the cursor when the mouse went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClickTarget {
    #[default]
    None,
    PlayButton,
    /// No sprite exists for the quit and settings buttons yet.
    QuitButton,
    SettingsButton,
    SelectButton,
}

/// The serum icon under the cursor when the mouse went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SerumChoice {
    #[default]
    None,
    Green,
    Yellow,
    Blue,
    DarkBlue,
    RedBlood,
    BlueBlood,
    BlackBlood,
}

impl SerumChoice {
    /// Every selectable serum, in hit-test order.
    pub const ALL: [SerumChoice; 7] = [
        SerumChoice::Green,
        SerumChoice::Yellow,
        SerumChoice::Blue,
        SerumChoice::DarkBlue,
        SerumChoice::RedBlood,
        SerumChoice::BlueBlood,
        SerumChoice::BlackBlood,
    ];

    pub fn sprite(self) -> Option<SpriteId> {
        match self {
            SerumChoice::None => None,
            SerumChoice::Green => Some(SpriteId::GreenSerum),
            SerumChoice::Yellow => Some(SpriteId::YellowSerum),
            SerumChoice::Blue => Some(SpriteId::BlueSerum),
            SerumChoice::DarkBlue => Some(SpriteId::DarkBlueSerum),
            SerumChoice::RedBlood => Some(SpriteId::RedBlood),
            SerumChoice::BlueBlood => Some(SpriteId::BlueBlood),
            SerumChoice::BlackBlood => Some(SpriteId::BlackBlood),
        }
    }

    /// Serum drawn by the given sprite, if any.
    pub fn from_sprite(sprite: SpriteId) -> Option<SerumChoice> {
        Self::ALL
            .into_iter()
            .find(|serum| serum.sprite() == Some(sprite))
    }
}

impl ClickTarget {
    /// Every button with a sprite, in hit-test order.
    pub const CHECK_ORDER: [ClickTarget; 2] = [ClickTarget::PlayButton, ClickTarget::SelectButton];

    pub fn sprite(self) -> Option<SpriteId> {
        match self {
            ClickTarget::PlayButton => Some(SpriteId::PlayButton),
            ClickTarget::SelectButton => Some(SpriteId::SelectButton),
            ClickTarget::None | ClickTarget::QuitButton | ClickTarget::SettingsButton => None,
        }
    }
}

impl Screen {
    /// Buttons that respond to clicks on this screen, in hit-test order.
    pub fn live_targets(self) -> &'static [ClickTarget] {
        match self {
            Screen::MainMenu => &[ClickTarget::PlayButton],
            Screen::SerumSelect => &[ClickTarget::SelectButton],
            _ => &[],
        }
    }

    /// Serum icons that respond to clicks on this screen, in hit-test order.
    pub fn live_serums(self) -> &'static [SerumChoice] {
        match self {
            Screen::SerumSelect => &SerumChoice::ALL,
            _ => &[],
        }
    }
}

/// A committed click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Click(ClickTarget),
    Serum(SerumChoice),
}

/// What a committed click does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Enter { screen: Screen, begin_wipe: bool },
    /// The serum is picked: remember it and mark its icon as used.
    SerumSelected(SerumChoice),
}

pub fn transition(current: Screen, trigger: Trigger) -> Outcome {
    match (current, trigger) {
        (Screen::MainMenu, Trigger::Click(ClickTarget::PlayButton)) => Outcome::Enter {
            screen: Screen::SerumSelect,
            begin_wipe: true,
        },
        (Screen::SerumSelect, Trigger::Click(ClickTarget::SelectButton)) => Outcome::Enter {
            screen: Screen::MixingSerums,
            begin_wipe: false,
        },
        (Screen::SerumSelect, Trigger::Serum(serum)) if serum != SerumChoice::None => {
            Outcome::SerumSelected(serum)
        }
        _ => Outcome::Unchanged,
    }
}
