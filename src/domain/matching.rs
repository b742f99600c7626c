//! Vendor matching fan-out
//!
//! On publication, vendors whose declared interest categories intersect the
//! RFI's categories are matched, each at most once.

use std::collections::HashSet;

use super::rfi::Category;
use super::user::{UserKind, UserProfile};

/// A vendor matched at publish time, with one representative category.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorMatch {
    pub vendor: UserProfile,
    /// The first category, by the RFI's category ordering, appearing in
    /// both the RFI's and the vendor's sets.
    pub matched_category: Category,
}

/// Match vendors against an RFI's category list.
///
/// Profiles that are not vendors, or that declare no interest categories,
/// are excluded before matching. A vendor appears at most once in the
/// output even when several categories intersect.
pub fn match_vendors(categories: &[Category], vendors: &[UserProfile]) -> Vec<VendorMatch> {
    let mut matched_ids = HashSet::new();
    let mut matches = Vec::new();

    for vendor in vendors {
        if vendor.kind != UserKind::Vendor || vendor.interest_categories.is_empty() {
            continue;
        }
        if matched_ids.contains(&vendor.id) {
            continue;
        }

        let representative = categories
            .iter()
            .copied()
            .find(|category| vendor.interest_categories.contains(category));

        if let Some(matched_category) = representative {
            matched_ids.insert(vendor.id);
            matches.push(VendorMatch {
                vendor: vendor.clone(),
                matched_category,
            });
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn vendor(categories: Vec<Category>) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Vendor Co".to_string(),
            email: "sales@vendor.example".to_string(),
            kind: UserKind::Vendor,
            interest_categories: categories,
        }
    }

    #[test]
    fn test_vendor_matched_once_with_first_ordered_category() {
        let rfi_categories = vec![
            Category::DataAnalytics,
            Category::CloudServices,
            Category::CyberSecurity,
        ];
        // Interested in two of the RFI's categories; ordering of the
        // vendor's own list must not matter.
        let profile = vendor(vec![Category::CyberSecurity, Category::CloudServices]);

        let matches = match_vendors(&rfi_categories, &[profile.clone()]);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].vendor.id, profile.id);
        assert_eq!(matches[0].matched_category, Category::CloudServices);
    }

    #[test]
    fn test_duplicate_profiles_deduplicated_by_identity() {
        let profile = vendor(vec![Category::CloudServices]);
        let matches = match_vendors(
            &[Category::CloudServices],
            &[profile.clone(), profile.clone()],
        );
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_no_intersection_no_match() {
        let profile = vendor(vec![Category::ItConsulting]);
        let matches = match_vendors(&[Category::CloudServices], &[profile]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_interest_set_excluded() {
        let profile = vendor(Vec::new());
        let matches = match_vendors(&[Category::CloudServices], &[profile]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_non_vendor_kinds_excluded() {
        let mut profile = vendor(vec![Category::CloudServices]);
        profile.kind = UserKind::Buyer;
        let matches = match_vendors(&[Category::CloudServices], &[profile]);
        assert!(matches.is_empty());
    }
}
