/// Which procedural plant model a field shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlantVariant {
    Corn,
    Wheat,
    None,
}

impl PlantVariant {
    /// Case-insensitive substring match on the crop name.
    ///
    /// "corn" or "maize" selects corn and is checked before "wheat", so a crop
    /// naming both shows corn. Anything else, including no crop, shows nothing.
    pub fn from_crop(crop: Option<&str>) -> Self {
        let Some(crop) = crop else {
            return PlantVariant::None;
        };
        let crop = crop.to_lowercase();
        if crop.contains("corn") || crop.contains("maize") {
            PlantVariant::Corn
        } else if crop.contains("wheat") {
            PlantVariant::Wheat
        } else {
            PlantVariant::None
        }
    }
}

/// One field of the farm as entered by the user.
///
/// `width` and `length` are in metres-ish scene units before scaling and are
/// expected to be positive. They are not validated: zero gives a degenerate
/// plot and a negative value mirrors it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub width: f32,
    pub length: f32,
    pub crop: Option<String>,
    pub soil_type: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, width: f32, length: f32) -> Self {
        Self {
            name: name.into(),
            width,
            length,
            crop: None,
            soil_type: None,
        }
    }

    /// The field a new profile row starts with: "Field N", 10 by 10
    pub fn numbered(index: usize) -> Self {
        Self::new(format!("Field {}", index + 1), 10.0, 10.0)
    }

    pub fn with_crop(mut self, crop: impl Into<String>) -> Self {
        self.crop = Some(crop.into());
        self
    }

    pub fn with_soil_type(mut self, soil_type: impl Into<String>) -> Self {
        self.soil_type = Some(soil_type.into());
        self
    }

    /// True when a non-empty crop name is set
    pub fn is_planted(&self) -> bool {
        self.crop.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn variant(&self) -> PlantVariant {
        PlantVariant::from_crop(self.crop.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_names_select_variant() {
        assert_eq!(PlantVariant::from_crop(Some("Sweet Corn")), PlantVariant::Corn);
        assert_eq!(PlantVariant::from_crop(Some("MAIZE")), PlantVariant::Corn);
        assert_eq!(PlantVariant::from_crop(Some("winter Wheat")), PlantVariant::Wheat);
        assert_eq!(PlantVariant::from_crop(Some("Soybeans")), PlantVariant::None);
        assert_eq!(PlantVariant::from_crop(Some("")), PlantVariant::None);
        assert_eq!(PlantVariant::from_crop(None), PlantVariant::None);
    }

    #[test]
    fn corn_wins_over_wheat() {
        assert_eq!(
            PlantVariant::from_crop(Some("wheat after corn")),
            PlantVariant::Corn
        );
    }

    #[test]
    fn empty_crop_is_fallow() {
        assert!(!FieldDescriptor::new("a", 1.0, 1.0).is_planted());
        assert!(!FieldDescriptor::new("a", 1.0, 1.0).with_crop("").is_planted());
        assert!(FieldDescriptor::new("a", 1.0, 1.0).with_crop("Soy").is_planted());
    }

    #[test]
    fn numbered_fields_start_at_one() {
        let field = FieldDescriptor::numbered(2).with_soil_type("loam");
        assert_eq!(field.name, "Field 3");
        assert_eq!((field.width, field.length), (10.0, 10.0));
        assert_eq!(field.soil_type.as_deref(), Some("loam"));
    }
}
