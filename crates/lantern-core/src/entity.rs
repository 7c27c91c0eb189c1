use std::fmt;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

numeric_id!(
    /// The `data_id` of a location.
    LocationId
);
numeric_id!(
    /// The `data_id` of a command.
    CommandId
);
numeric_id!(
    /// The `data_id` of an event.
    EventId
);
numeric_id!(
    /// The `data_id` of an inventory.
    InventoryId
);
numeric_id!(
    /// The `data_id` of an item as declared in the world description.
    ///
    /// Copies of a copyable item share their original's data id.
    DataId
);

/// Arena slot of an item instance inside a [`World`](crate::World).
///
/// Unlike [`DataId`], every copy of a copyable item gets its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(pub usize);

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display text attached to locations and items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Labels {
    /// Single-token name the player types ("lamp").
    pub shortname: String,
    /// Name used in listings ("a brass lamp").
    pub longname: String,
    /// Full description.
    pub description: String,
    /// Alternative descriptions that events can attach.
    pub extended_descriptions: Vec<String>,
    /// Index of the extended description currently attached, if any.
    pub extension: Option<usize>,
}

impl Labels {
    /// Labels with the same text for every name.
    pub fn new(
        shortname: impl Into<String>,
        longname: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            shortname: shortname.into(),
            longname: longname.into(),
            description: description.into(),
            extended_descriptions: Vec::new(),
            extension: None,
        }
    }

    /// The base description followed by the attached extension.
    pub fn full_description(&self) -> String {
        match self
            .extension
            .and_then(|index| self.extended_descriptions.get(index))
        {
            Some(extra) if self.description.is_empty() => extra.clone(),
            Some(extra) => format!("{} {}", self.description, extra),
            None => self.description.clone(),
        }
    }
}
