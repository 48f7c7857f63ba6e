use serde::{Deserialize, Serialize};

/// Opaque route identifier as used by the transit API (`"Red"`, `"Green-B"`, `"CR-Lowell"`)
pub type LineId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Subway,
    LightRail,
    CommuterRail,
}

impl LineKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Subway => "Subway",
            Self::LightRail => "Light Rail",
            Self::CommuterRail => "Commuter Rail",
        }
    }
}

/// A line the viewer knows about at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitLine {
    pub id: LineId,
    pub name: String,
    pub kind: LineKind,
    /// Swatch color for the toggle panel; the drawn shape uses the API's color
    pub color: String,
}

impl TransitLine {
    fn new(id: &str, name: &str, kind: LineKind, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            color: color.to_string(),
        }
    }

    /// Rapid transit and commuter rail lines, in load order
    #[must_use]
    pub fn catalogue() -> Vec<Self> {
        use LineKind::{CommuterRail, LightRail, Subway};

        vec![
            Self::new("Red", "Red Line", Subway, "#DA291C"),
            Self::new("Orange", "Orange Line", Subway, "#ED8B00"),
            Self::new("Blue", "Blue Line", Subway, "#003DA5"),
            Self::new("Green-B", "Green Line B", LightRail, "#00843D"),
            Self::new("Green-C", "Green Line C", LightRail, "#00843D"),
            Self::new("Green-D", "Green Line D", LightRail, "#00843D"),
            Self::new("Green-E", "Green Line E", LightRail, "#00843D"),
            Self::new("Mattapan", "Mattapan Trolley", LightRail, "#DA291C"),
            Self::new("CR-Fairmount", "Fairmount Line", CommuterRail, "#80276C"),
            Self::new("CR-Fitchburg", "Fitchburg Line", CommuterRail, "#80276C"),
            Self::new("CR-Worcester", "Framingham/Worcester Line", CommuterRail, "#80276C"),
            Self::new("CR-Franklin", "Franklin/Foxboro Line", CommuterRail, "#80276C"),
            Self::new("CR-Greenbush", "Greenbush Line", CommuterRail, "#80276C"),
            Self::new("CR-Haverhill", "Haverhill Line", CommuterRail, "#80276C"),
            Self::new("CR-Kingston", "Kingston Line", CommuterRail, "#80276C"),
            Self::new("CR-Lowell", "Lowell Line", CommuterRail, "#80276C"),
            Self::new("CR-Middleborough", "Middleborough/Lakeville Line", CommuterRail, "#80276C"),
            Self::new("CR-Needham", "Needham Line", CommuterRail, "#80276C"),
            Self::new("CR-Newburyport", "Newburyport/Rockport Line", CommuterRail, "#80276C"),
            Self::new("CR-Providence", "Providence/Stoughton Line", CommuterRail, "#80276C"),
        ]
    }
}
