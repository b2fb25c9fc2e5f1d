//! Travel assistant intents.

use layered_conversation::{Slot, Token, TokenType};

use crate::definition::{unknown_role, TemplateDefinition};

/// Planning a journey between two places.
#[derive(Debug, Clone, Copy, Default)]
pub struct TravelDefinition;

impl TravelDefinition {
    pub const TYPE: &'static str = "Reiseplanung";
    pub const FROM: &'static str = "from";
    pub const TO: &'static str = "to";
    pub const VIA: &'static str = "via";
    pub const DEPART: &'static str = "depart";
    pub const ARRIVE: &'static str = "arrive";
    pub const CARD: &'static str = "card";
    pub const CLASS: &'static str = "class";
}

impl TemplateDefinition for TravelDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        let slot = match role {
            Self::FROM => Slot::required(Self::FROM, Some(TokenType::Place))
                .with_inquiry("Wo möchtest Du abfahren?"),
            Self::TO => Slot::required(Self::TO, Some(TokenType::Place))
                .with_inquiry("Wohin möchtest Du?"),
            Self::VIA => Slot::new(Self::VIA, Some(TokenType::Place)),
            Self::DEPART => Slot::new(Self::DEPART, Some(TokenType::Date))
                .with_inquiry("Wann willst Du los?"),
            Self::ARRIVE => Slot::new(Self::ARRIVE, Some(TokenType::Date))
                .with_inquiry("Wann willst Du ankommen?"),
            Self::CARD => Slot::new(Self::CARD, Some(TokenType::Product))
                .with_inquiry("Hast Du eine Kundenkarte?"),
            Self::CLASS => Slot::new(Self::CLASS, Some(TokenType::Product))
                .with_inquiry("Welcher Klasse möchtest Du reisen?"),
            _ => return unknown_role(Self::TYPE, role),
        };
        Some(slot)
    }

    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool {
        let present = self.present_and_valid_roles(slots, tokens);
        present.contains(Self::FROM)
            && present.contains(Self::TO)
            && (present.contains(Self::DEPART) || present.contains(Self::ARRIVE))
    }
}

/// Questions about a specific train or connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainInfoDefinition;

impl TrainInfoDefinition {
    pub const TYPE: &'static str = "Zuginformation";
    pub const TRAIN: &'static str = "train";
    pub const DATE: &'static str = "date";
    pub const FROM: &'static str = "from";
    pub const TO: &'static str = "to";
    pub const WHAT: &'static str = "what";
}

impl TemplateDefinition for TrainInfoDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        let slot = match role {
            Self::TRAIN => Slot::new(Self::TRAIN, Some(TokenType::Train))
                .with_inquiry("Um welchen Zug geht es?"),
            Self::DATE => Slot::required(Self::DATE, Some(TokenType::Date))
                .with_inquiry("Geht es um den aktuellen Zug?"),
            Self::FROM => Slot::new(Self::FROM, Some(TokenType::Place))
                .with_inquiry("Wo ist der Zug abgefahren?"),
            Self::TO => Slot::new(Self::TO, Some(TokenType::Place))
                .with_inquiry("Wohin fährt der Zug?"),
            Self::WHAT => Slot::new(Self::WHAT, None).with_inquiry("Was suchst Du genau?"),
            _ => return unknown_role(Self::TYPE, role),
        };
        Some(slot)
    }

    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool {
        let present = self.present_and_valid_roles(slots, tokens);
        present.contains(Self::DATE)
            && (present.contains(Self::TRAIN)
                || (present.contains(Self::FROM) && present.contains(Self::TO)))
    }
}

/// Searching for something around a location.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerimeterDefinition;

impl PerimeterDefinition {
    pub const TYPE: &'static str = "Umkreissuche";
    pub const LOCATION: &'static str = "location";
    pub const START: &'static str = "start";
    pub const END: &'static str = "end";
    pub const WHAT: &'static str = "what";
}

impl TemplateDefinition for PerimeterDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        let slot = match role {
            Self::LOCATION => Slot::required(Self::LOCATION, Some(TokenType::Place))
                .with_inquiry("Und wo genau?"),
            Self::START => Slot::new(Self::START, Some(TokenType::Date)).with_inquiry("Ab wann?"),
            Self::END => Slot::new(Self::END, Some(TokenType::Date)).with_inquiry("Bis wann?"),
            Self::WHAT => Slot::required(Self::WHAT, None).with_inquiry("Was genau suchst Du?"),
            _ => return unknown_role(Self::TYPE, role),
        };
        Some(slot)
    }

    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool {
        let present = self.present_and_valid_roles(slots, tokens);
        present.contains(Self::LOCATION) && present.contains(Self::WHAT)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductDefinition;

impl ProductDefinition {
    pub const TYPE: &'static str = "Produkt";
    pub const PRODUCT: &'static str = "product";
    pub const WHAT: &'static str = "what";
}

impl TemplateDefinition for ProductDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, role: &str) -> Option<Slot> {
        let slot = match role {
            Self::PRODUCT => Slot::required(Self::PRODUCT, Some(TokenType::Product))
                .with_inquiry("Was möchtest Du wissen?"),
            Self::WHAT => Slot::new(Self::WHAT, None).with_inquiry("Was suchst Du genau?"),
            _ => return unknown_role(Self::TYPE, role),
        };
        Some(slot)
    }

    fn validate(&self, slots: &[Slot], tokens: &[Token]) -> bool {
        self.present_and_valid_roles(slots, tokens)
            .contains(Self::PRODUCT)
    }
}

/// Catch-all intent without roles of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct OtherDefinition;

impl OtherDefinition {
    pub const TYPE: &'static str = "Sonstiges";
}

impl TemplateDefinition for OtherDefinition {
    fn template_type(&self) -> &'static str {
        Self::TYPE
    }

    fn create_slot_for_role(&self, _role: &str) -> Option<Slot> {
        None
    }

    fn validate(&self, _slots: &[Slot], _tokens: &[Token]) -> bool {
        true
    }
}
