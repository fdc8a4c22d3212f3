use fixprep::fixfiles::canonical_names;
use std::collections::BTreeSet;

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn halo0_files_keep_their_name_and_gain_a_tile1_alias() {
    assert_eq!(
        canonical_names("C403_oro_data.tile7.halo0.nc", "C403"),
        set(&[
            "C403_oro_data.tile1.halo0.nc",
            "C403_oro_data.tile7.halo0.nc",
        ])
    );
}

#[test]
fn wide_halo_files_are_rewritten_to_halo4_and_aliased_without_the_marker() {
    assert_eq!(
        canonical_names("C403.facsf.tile7.halo4.nc", "C403"),
        set(&["C403.facsf.tile7.halo4.nc", "C403.facsf.tile7.nc"])
    );
    assert_eq!(
        canonical_names("C403_grid.tile7.halo3.nc", "C403"),
        set(&["C403_grid.tile7.halo4.nc", "C403_grid.tile7.nc"])
    );
}

#[test]
fn unmarked_files_are_halo0_by_construction() {
    assert_eq!(
        canonical_names("facsf.tile7.nc", "C403"),
        set(&["C403.facsf.tile7.halo0.nc", "C403.facsf.tile1.halo0.nc"])
    );
    // No tile 7 in the name: a single canonical name.
    assert_eq!(
        canonical_names("snowfree_albedo.tile6.nc", "C403"),
        set(&["C403.snowfree_albedo.tile6.halo0.nc"])
    );
}
