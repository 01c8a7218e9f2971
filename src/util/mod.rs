//! Small utilities shared by the camera modules.
//!
//! [`NamedEnum`] maps fieldless enums to their programmatic names and back
//! through an explicit static table, so no compiler-specific symbol
//! formatting is involved.

use std::fmt::Debug;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum UtilError {
    #[error("Invalid enum value: {0}")]
    InvalidEnumValue(i64),
    #[error("Invalid enum name: {0}")]
    InvalidEnumName(String),
}

/// Name <-> value reflection for fieldless enums.
///
/// Implementors list every variant once in [`NamedEnum::VARIANTS`]. Both
/// lookup directions are fallible and report an error instead of returning
/// an empty or sentinel value.
///
/// # Examples
///
/// ```rust
/// use camera_geometry::camera::CameraModelType;
/// use camera_geometry::util::NamedEnum;
///
/// assert_eq!(CameraModelType::PinholeCameraBrown.name(), "PINHOLE_CAMERA_BROWN");
/// assert_eq!(
///     CameraModelType::from_name("PINHOLE_CAMERA").unwrap(),
///     CameraModelType::PinholeCamera
/// );
/// assert!(CameraModelType::from_name("FISHEYE").is_err());
/// ```
pub trait NamedEnum: Sized + Copy + PartialEq + Debug + 'static {
    /// Every variant paired with its programmatic name.
    const VARIANTS: &'static [(&'static str, Self)];

    /// Integer representation of the variant.
    fn to_index(self) -> i64;

    /// Returns the programmatic name of this variant.
    fn name(self) -> &'static str {
        Self::VARIANTS
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(name, _)| *name)
            // VARIANTS lists every variant
            .unwrap_or("")
    }

    /// Looks up a variant by its integer representation.
    fn from_index(index: i64) -> Result<Self, UtilError> {
        Self::VARIANTS
            .iter()
            .map(|(_, value)| *value)
            .find(|value| value.to_index() == index)
            .ok_or(UtilError::InvalidEnumValue(index))
    }

    /// Returns the name for an integer representation, failing on values
    /// outside the enum.
    fn name_of_index(index: i64) -> Result<&'static str, UtilError> {
        Self::from_index(index).map(Self::name)
    }

    /// Looks up a variant by its programmatic name.
    fn from_name(name: &str) -> Result<Self, UtilError> {
        if name.is_empty() {
            return Err(UtilError::InvalidEnumName(name.to_string()));
        }
        Self::VARIANTS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| *value)
            .ok_or_else(|| UtilError::InvalidEnumName(name.to_string()))
    }

    /// Whether `name` names a variant of this enum.
    fn contains_name(name: &str) -> bool {
        Self::from_name(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Fruit {
        Apple,
        Banana,
        Orange,
        Pear,
        Pineapple,
        Mango,
        Kiwi,
    }

    impl NamedEnum for Fruit {
        const VARIANTS: &'static [(&'static str, Self)] = &[
            ("Apple", Fruit::Apple),
            ("Banana", Fruit::Banana),
            ("Orange", Fruit::Orange),
            ("Pear", Fruit::Pear),
            ("Pineapple", Fruit::Pineapple),
            ("Mango", Fruit::Mango),
            ("Kiwi", Fruit::Kiwi),
        ];

        fn to_index(self) -> i64 {
            self as i64
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(Fruit::Apple.name(), "Apple");
        assert_eq!(Fruit::Kiwi.name(), "Kiwi");
    }

    #[test]
    fn test_name_of_invalid_index() {
        let err = Fruit::name_of_index(100).unwrap_err();
        assert_eq!(err, UtilError::InvalidEnumValue(100));
        assert_eq!(err.to_string(), "Invalid enum value: 100");
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Fruit::from_name("Apple").unwrap(), Fruit::Apple);
        assert_eq!(Fruit::from_name("Pineapple").unwrap(), Fruit::Pineapple);
        assert_eq!(Fruit::from_name("Kiwi").unwrap(), Fruit::Kiwi);
    }

    #[test]
    fn test_from_unknown_or_empty_name() {
        assert_eq!(
            Fruit::from_name("Durian").unwrap_err().to_string(),
            "Invalid enum name: Durian"
        );
        assert!(Fruit::from_name("").is_err());
        assert!(!Fruit::contains_name("apple"));
        assert!(Fruit::contains_name("Mango"));
    }

    #[test]
    fn test_index_round_trip() {
        for (name, fruit) in Fruit::VARIANTS {
            assert_eq!(Fruit::from_index(fruit.to_index()).unwrap(), *fruit);
            assert_eq!(Fruit::name_of_index(fruit.to_index()).unwrap(), *name);
        }
    }
}
