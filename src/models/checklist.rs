/// Extra behavior attached to a link item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinkMeta {
    /// e.g. `"call911"`
    pub kind: Option<String>,
    /// Checking the item offers to alert leadership
    pub trigger_leadership_on_complete: bool,
}

/// Tappable step, usually a phone number
#[derive(Debug, Clone, PartialEq)]
pub struct LinkItem {
    pub label: String,
    pub link: String,
    pub meta: Option<LinkMeta>,
}

impl LinkItem {
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: LinkMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn triggers_leadership(&self) -> bool {
        self.meta
            .as_ref()
            .is_some_and(|m| m.trigger_leadership_on_complete)
    }
}

/// Piece of a mixed text/link item
#[derive(Debug, Clone, PartialEq)]
pub enum ChecklistPart {
    Text(String),
    Link(LinkItem),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChecklistItem {
    Text(String),
    Link(LinkItem),
    Parts(Vec<ChecklistPart>),
}

impl ChecklistItem {
    pub fn text(label: impl Into<String>) -> Self {
        ChecklistItem::Text(label.into())
    }

    /// Whether checking this item should open the leadership alert
    pub fn triggers_leadership(&self) -> bool {
        match self {
            ChecklistItem::Text(_) => false,
            ChecklistItem::Link(link) => link.triggers_leadership(),
            ChecklistItem::Parts(parts) => parts
                .iter()
                .any(|p| matches!(p, ChecklistPart::Link(link) if link.triggers_leadership())),
        }
    }

    /// Plain-text rendering
    pub fn label(&self) -> String {
        match self {
            ChecklistItem::Text(text) => text.clone(),
            ChecklistItem::Link(link) => link.label.clone(),
            ChecklistItem::Parts(parts) => parts
                .iter()
                .map(|p| match p {
                    ChecklistPart::Text(text) => text.as_str(),
                    ChecklistPart::Link(link) => link.label.as_str(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

impl Checklist {
    /// Placeholder for categories without content yet
    pub fn coming_soon() -> Self {
        Self {
            title: "Coming Soon".to_string(),
            items: Vec::new(),
        }
    }
}

/// A crisis type on the category screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrisisCategory {
    pub name: &'static str,
    /// Route segment and storage key suffix
    pub slug: &'static str,
}

pub const CATEGORIES: [CrisisCategory; 6] = [
    CrisisCategory { name: "Fire", slug: "fire" },
    CrisisCategory { name: "Security", slug: "security" },
    CrisisCategory { name: "Cyber Attack", slug: "cyber" },
    CrisisCategory { name: "Severe Weather", slug: "weather" },
    CrisisCategory { name: "Medical Emergency", slug: "medical" },
    CrisisCategory { name: "Other", slug: "other" },
];

const EMERGENCY_LINE: &str = "tel:7067364748";

/// Built-in checklist for `slug`; unknown categories get [`Checklist::coming_soon`]
pub fn checklist_for(slug: &str) -> Checklist {
    match slug {
        "fire" => Checklist {
            title: "Fire Emergency Checklist".to_string(),
            items: vec![
                ChecklistItem::Link(LinkItem::new("Call 911", EMERGENCY_LINE).with_meta(
                    LinkMeta {
                        kind: Some("call911".to_string()),
                        trigger_leadership_on_complete: true,
                    },
                )),
                ChecklistItem::text("Get to safety"),
                ChecklistItem::text("Evacuate residents if able"),
                ChecklistItem::text("Use fire extinguisher if safe to do so"),
                ChecklistItem::text("Close doors behind you"),
                ChecklistItem::text("Do not use elevators"),
                ChecklistItem::text("Notify fire department of any trapped individuals"),
                ChecklistItem::text("Gather at designated assembly point"),
                ChecklistItem::text("Check for injuries and administer first aid if trained"),
                ChecklistItem::text("Do not re-enter the building until cleared by authorities"),
            ],
        },
        "cyber" => Checklist {
            title: "Cyber Attack Checklist".to_string(),
            items: vec![
                ChecklistItem::Link(LinkItem::new("Contact MSP", EMERGENCY_LINE)),
                ChecklistItem::Link(LinkItem::new(
                    "Contact Information & Systems Manager",
                    EMERGENCY_LINE,
                )),
                ChecklistItem::Link(LinkItem::new("Contact Company President", EMERGENCY_LINE)),
                ChecklistItem::Link(LinkItem::new("Contact CEO", EMERGENCY_LINE)),
                ChecklistItem::text("Log off all systems"),
                ChecklistItem::text("Disconnect from network"),
                ChecklistItem::text("Notify all employees"),
                ChecklistItem::text("Change all passwords"),
                ChecklistItem::text("Backup critical data"),
                ChecklistItem::text("Document all actions taken"),
                ChecklistItem::text("Contact law enforcement if necessary"),
                ChecklistItem::text("Review and update cybersecurity policies"),
                ChecklistItem::text("Conduct a post-incident review"),
            ],
        },
        _ => Checklist::coming_soon(),
    }
}

/// Checked state of one checklist, one flag per item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistProgress {
    pub checked: Vec<bool>,
}

impl ChecklistProgress {
    pub fn total(&self) -> usize {
        self.checked.len()
    }

    pub fn done(&self) -> usize {
        self.checked.iter().filter(|c| **c).count()
    }

    pub fn remaining(&self) -> usize {
        self.total() - self.done()
    }

    /// Rounded completion percentage; 0 for an empty checklist
    pub fn percent(&self) -> u8 {
        if self.checked.is_empty() {
            return 0;
        }
        (self.done() as f64 / self.total() as f64 * 100.0).round() as u8
    }

    /// Item indexes in display order: open items first, each group keeping
    /// its catalogue order
    pub fn ordered_indexes(&self) -> Vec<usize> {
        let mut indexes: Vec<usize> = (0..self.total()).collect();
        indexes.sort_by_key(|&i| self.checked[i]);
        indexes
    }
}
