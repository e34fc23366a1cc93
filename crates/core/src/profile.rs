//! Unit categories and layout profiles.
//!
//! Both catalogs are static: a [`ProfileCatalog`] is built once and shared
//! read-only between any number of concurrent optimizations.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance on the sum of a size mix.
const MIX_TOLERANCE: f64 = 1e-6;

/// Size class of a placement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CategoryKind {
    Small,
    Medium,
    Large,
}

impl CategoryKind {
    /// All categories in catalog order.
    pub const ALL: [CategoryKind; 3] = [CategoryKind::Small, CategoryKind::Medium, CategoryKind::Large];

    /// Lowercase name of the category.
    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

/// Dimensions and presentation attributes of a unit class.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnitCategory {
    pub kind: CategoryKind,
    pub width: f64,
    pub height: f64,
    /// Display color as a `#RRGGBB` string.
    pub display_color: String,
    /// Lower rank = more important.
    pub priority_rank: u8,
}

impl UnitCategory {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Fixed catalog of the three unit classes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawUnitCatalog"))]
pub struct UnitCatalog {
    categories: Vec<UnitCategory>,
}

impl UnitCatalog {
    /// The standard small/medium/large catalog.
    pub fn standard() -> Self {
        Self {
            categories: vec![
                UnitCategory {
                    kind: CategoryKind::Small,
                    width: 2.0,
                    height: 2.5,
                    display_color: "#10B981".into(),
                    priority_rank: 3,
                },
                UnitCategory {
                    kind: CategoryKind::Medium,
                    width: 3.0,
                    height: 4.0,
                    display_color: "#059669".into(),
                    priority_rank: 2,
                },
                UnitCategory {
                    kind: CategoryKind::Large,
                    width: 4.0,
                    height: 5.0,
                    display_color: "#047857".into(),
                    priority_rank: 1,
                },
            ],
        }
    }

    /// The standard catalog with every category resized to `width x height`.
    ///
    /// Categories keep their color and rank, so a uniform layout still
    /// reports its mix.
    pub fn uniform(width: f64, height: f64) -> Self {
        let mut catalog = Self::standard();
        for category in &mut catalog.categories {
            category.width = width;
            category.height = height;
        }
        catalog
    }

    /// Looks up a category.
    pub fn get(&self, kind: CategoryKind) -> &UnitCategory {
        // Every catalog is built with all three kinds in `ALL` order
        &self.categories[kind as usize]
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawUnitCatalog {
    categories: Vec<UnitCategory>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawUnitCatalog> for UnitCatalog {
    type Error = Error;

    fn try_from(raw: RawUnitCatalog) -> Result<Self> {
        let kinds: Vec<CategoryKind> = raw.categories.iter().map(|c| c.kind).collect();
        if kinds != CategoryKind::ALL {
            return Err(Error::InvalidProfile(format!(
                "unit catalog must list small, medium, large in order, got {:?}",
                kinds
            )));
        }
        if let Some(bad) = raw.categories.iter().find(|c| {
            !(c.width.is_finite() && c.height.is_finite() && c.width > 0.0 && c.height > 0.0)
        }) {
            return Err(Error::InvalidProfile(format!(
                "unit category {} must have a positive size, got {}x{}",
                bad.kind.name(),
                bad.width,
                bad.height
            )));
        }
        Ok(Self {
            categories: raw.categories,
        })
    }
}

/// Qualitative density label of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Density {
    Sparse,
    Normal,
    Dense,
    VeryDense,
}

/// A named density preset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLayoutProfile"))]
pub struct LayoutProfile {
    id: String,
    coverage: f64,
    density: Density,
    size_mix: Vec<(CategoryKind, f64)>,
    min_spacing: f64,
}

impl LayoutProfile {
    /// Creates a profile, checking that the coverage lies in `(0, 1]`, that
    /// the mix is a probability distribution and that the spacing is
    /// positive.
    pub fn new(
        id: impl Into<String>,
        coverage: f64,
        density: Density,
        size_mix: Vec<(CategoryKind, f64)>,
        min_spacing: f64,
    ) -> Result<Self> {
        let id = id.into();

        if !(coverage > 0.0 && coverage <= 1.0) {
            return Err(Error::InvalidProfile(format!(
                "coverage for '{}' must be in (0, 1], got {}",
                id, coverage
            )));
        }
        if size_mix.is_empty() || size_mix.iter().any(|&(_, p)| !p.is_finite() || p < 0.0) {
            return Err(Error::InvalidProfile(format!(
                "size mix for '{}' must be non-empty with non-negative weights",
                id
            )));
        }
        let total: f64 = size_mix.iter().map(|&(_, p)| p).sum();
        if (total - 1.0).abs() > MIX_TOLERANCE {
            return Err(Error::InvalidProfile(format!(
                "size mix for '{}' sums to {}, expected 1",
                id, total
            )));
        }
        if !(min_spacing > 0.0 && min_spacing.is_finite()) {
            return Err(Error::InvalidProfile(format!(
                "minimum spacing for '{}' must be positive, got {}",
                id, min_spacing
            )));
        }

        Ok(Self {
            id,
            coverage,
            density,
            size_mix,
            min_spacing,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Target fraction of the placeable area covered by units.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    pub fn density(&self) -> Density {
        self.density
    }

    /// Category probabilities in draw order.
    pub fn size_mix(&self) -> &[(CategoryKind, f64)] {
        &self.size_mix
    }

    /// Minimum clearance between two unit rectangles.
    pub fn min_spacing(&self) -> f64 {
        self.min_spacing
    }

    /// Expected unit area under this profile's mix.
    pub fn weighted_unit_area(&self, catalog: &UnitCatalog) -> f64 {
        self.size_mix
            .iter()
            .map(|&(kind, p)| catalog.get(kind).area() * p)
            .sum()
    }

    /// Maps a uniform draw in `[0, 1)` to a category by cumulative weight.
    pub fn category_for(&self, draw: f64) -> CategoryKind {
        let mut cumulative = 0.0;
        for &(kind, p) in &self.size_mix {
            cumulative += p;
            if draw < cumulative {
                return kind;
            }
        }
        // Rounding left the draw past the last bucket
        self.size_mix
            .iter()
            .rev()
            .find(|&&(_, p)| p > 0.0)
            .map(|&(kind, _)| kind)
            .unwrap_or(CategoryKind::Medium)
    }
}

/// Unchecked profile fields, validated through [`LayoutProfile::new`].
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLayoutProfile {
    id: String,
    coverage: f64,
    density: Density,
    size_mix: Vec<(CategoryKind, f64)>,
    min_spacing: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLayoutProfile> for LayoutProfile {
    type Error = Error;

    fn try_from(raw: RawLayoutProfile) -> Result<Self> {
        Self::new(raw.id, raw.coverage, raw.density, raw.size_mix, raw.min_spacing)
    }
}

/// An ordered, immutable set of layout profiles addressed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCatalog {
    profiles: Vec<LayoutProfile>,
}

impl ProfileCatalog {
    /// The four standard presets: "10%", "25%", "30%", "35%".
    pub fn standard() -> Self {
        use CategoryKind::*;

        let presets = [
            ("10%", 0.10, Density::Sparse, [0.6, 0.3, 0.1], 2.0),
            ("25%", 0.25, Density::Normal, [0.4, 0.5, 0.1], 1.5),
            ("30%", 0.30, Density::Dense, [0.3, 0.5, 0.2], 1.2),
            ("35%", 0.35, Density::VeryDense, [0.2, 0.5, 0.3], 1.0),
        ];

        let profiles = presets
            .into_iter()
            .map(|(id, coverage, density, [s, m, l], spacing)| LayoutProfile {
                id: id.to_string(),
                coverage,
                density,
                size_mix: vec![(Small, s), (Medium, m), (Large, l)],
                min_spacing: spacing,
            })
            .collect();

        Self { profiles }
    }

    /// Adds a profile, replacing any existing profile with the same id.
    pub fn with_profile(mut self, profile: LayoutProfile) -> Self {
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
        self
    }

    /// Looks up a profile by id.
    pub fn get(&self, id: &str) -> Result<&LayoutProfile> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::ProfileNotFound(id.to_string()))
    }

    /// Profile ids in catalog order.
    pub fn ids(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.id.clone()).collect()
    }

    /// All profiles in catalog order.
    pub fn profiles(&self) -> &[LayoutProfile] {
        &self.profiles
    }
}

impl Default for ProfileCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
