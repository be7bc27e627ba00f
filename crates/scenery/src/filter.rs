//! Per-kind element toggles applied before submission (and optionally at
//! copy time).

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementType};

/// Which element kinds take part in a copy or a build.
///
/// Path surfaces and railings fold under `footpath`. A path addition needs
/// both `footpath` and `footpath_addition`: a bench without its path cannot
/// be placed anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementFilter {
    pub footpath: bool,
    pub footpath_addition: bool,
    pub small_scenery: bool,
    pub large_scenery: bool,
    pub wall: bool,
    pub banner: bool,
    pub entrance: bool,
    pub track: bool,
}

impl Default for ElementFilter {
    fn default() -> Self {
        Self {
            footpath: true,
            footpath_addition: true,
            small_scenery: true,
            large_scenery: true,
            wall: true,
            banner: true,
            entrance: true,
            track: true,
        }
    }
}

impl ElementFilter {
    /// Filter that lets nothing through; enable kinds one by one.
    pub fn none() -> Self {
        Self {
            footpath: false,
            footpath_addition: false,
            small_scenery: false,
            large_scenery: false,
            wall: false,
            banner: false,
            entrance: false,
            track: false,
        }
    }

    pub fn allows(&self, element_type: ElementType) -> bool {
        match element_type {
            ElementType::Footpath
            | ElementType::FootpathSurface
            | ElementType::FootpathRailings => self.footpath,
            ElementType::FootpathAddition => self.footpath && self.footpath_addition,
            ElementType::SmallScenery => self.small_scenery,
            ElementType::LargeScenery => self.large_scenery,
            ElementType::Wall => self.wall,
            ElementType::Banner => self.banner,
            ElementType::Entrance => self.entrance,
            ElementType::Track => self.track,
        }
    }

    pub fn allows_element(&self, element: &Element) -> bool {
        self.allows(element.element_type())
    }

    pub fn allows_everything(&self) -> bool {
        ElementType::ALL.iter().all(|t| self.allows(*t))
    }

    /// Types that pass, in [`ElementType::ALL`] order.
    pub fn allowed_types(&self) -> Vec<ElementType> {
        ElementType::ALL
            .iter()
            .copied()
            .filter(|t| self.allows(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_everything() {
        let filter = ElementFilter::default();
        assert!(filter.allows_everything());
        assert_eq!(filter.allowed_types().len(), ElementType::ALL.len());
    }

    #[test]
    fn test_footpath_toggle_covers_surface_railings_and_additions() {
        let filter = ElementFilter {
            footpath: false,
            ..Default::default()
        };
        assert!(!filter.allows(ElementType::Footpath));
        assert!(!filter.allows(ElementType::FootpathSurface));
        assert!(!filter.allows(ElementType::FootpathRailings));
        assert!(!filter.allows(ElementType::FootpathAddition));
        assert!(filter.allows(ElementType::Wall));
    }

    #[test]
    fn test_addition_toggle_alone_keeps_paths() {
        let filter = ElementFilter {
            footpath_addition: false,
            ..Default::default()
        };
        assert!(filter.allows(ElementType::Footpath));
        assert!(!filter.allows(ElementType::FootpathAddition));
    }

    #[test]
    fn test_none_then_enable_one() {
        let filter = ElementFilter {
            wall: true,
            ..ElementFilter::none()
        };
        assert_eq!(filter.allowed_types(), vec![ElementType::Wall]);
        assert!(!filter.allows_everything());
    }

    #[test]
    fn test_allowed_types_keep_declaration_order() {
        let filter = ElementFilter {
            wall: false,
            small_scenery: false,
            ..Default::default()
        };
        let expected: Vec<ElementType> = ElementType::ALL
            .iter()
            .copied()
            .filter(|t| !matches!(t, ElementType::Wall | ElementType::SmallScenery))
            .collect();
        assert_eq!(filter.allowed_types(), expected);
    }
}
