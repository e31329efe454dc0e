use std::collections::HashSet;
use terra_core::grid::{Grid, GridError, Topology, WrapPolicy};

fn coord_set(coords: Vec<(usize, usize)>) -> HashSet<(usize, usize)> {
    coords.into_iter().collect()
}

#[test]
fn test_filled_and_access() {
    let mut grid = Grid::filled(3, 2, Topology::Table, WrapPolicy::None, 0_u32).unwrap();
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.len(), 6);

    grid.set(2, 1, 42).unwrap();
    assert_eq!(grid.get(2, 1), Some(&42));
    assert_eq!(grid.get(0, 0), Some(&0));

    // Out of bounds
    assert_eq!(grid.get(3, 0), None);
    assert_eq!(grid.get(0, 2), None);
    assert_eq!(
        grid.set(3, 0, 1),
        Err(GridError::OutOfBounds { col: 3, row: 0 })
    );
}

#[test]
fn test_filled_rejects_zero_extent() {
    assert_eq!(
        Grid::filled(0, 3, Topology::Table, WrapPolicy::None, 0_u32),
        Err(GridError::EmptyShape)
    );
    assert_eq!(
        Grid::filled(3, 0, Topology::Table, WrapPolicy::None, 0_u32),
        Err(GridError::EmptyShape)
    );
}

#[test]
fn test_table_neighbors_none_wrap_drops_out_of_range() {
    let grid = Grid::filled(3, 3, Topology::Table, WrapPolicy::None, ()).unwrap();

    // Corner keeps only right and below.
    assert_eq!(
        coord_set(grid.neighbor_coords(0, 0)),
        coord_set(vec![(1, 0), (0, 1)])
    );
    // Center keeps all four.
    assert_eq!(
        coord_set(grid.neighbor_coords(1, 1)),
        coord_set(vec![(0, 1), (2, 1), (1, 0), (1, 2)])
    );
}

#[test]
fn test_table_neighbors_torus_wraps_both_axes() {
    let grid = Grid::filled(3, 3, Topology::Table, WrapPolicy::Torus, ()).unwrap();
    assert_eq!(
        coord_set(grid.neighbor_coords(0, 0)),
        coord_set(vec![(2, 0), (1, 0), (0, 2), (0, 1)])
    );
}

#[test]
fn test_horizontal_wrap_drops_rows_wraps_columns() {
    let grid = Grid::filled(3, 3, Topology::Table, WrapPolicy::Horizontal, ()).unwrap();
    // (0,0): left wraps to (2,0); above (0,-1) is dropped.
    assert_eq!(
        coord_set(grid.neighbor_coords(0, 0)),
        coord_set(vec![(2, 0), (1, 0), (0, 1)])
    );
}

#[test]
fn test_vertical_wrap_drops_columns_wraps_rows() {
    let grid = Grid::filled(3, 3, Topology::Table, WrapPolicy::Vertical, ()).unwrap();
    // (0,0): above wraps to (0,2); left (-1,0) is dropped.
    assert_eq!(
        coord_set(grid.neighbor_coords(0, 0)),
        coord_set(vec![(1, 0), (0, 2), (0, 1)])
    );
}

#[test]
fn test_hex_neighbor_counts() {
    let grid = Grid::filled(5, 5, Topology::Hex, WrapPolicy::None, ()).unwrap();
    // Interior hex cells have 6 neighbors regardless of parity.
    assert_eq!(grid.neighbor_coords(2, 2).len(), 6);
    assert_eq!(grid.neighbor_coords(1, 2).len(), 6);
    // On a torus every cell has 6.
    let torus = Grid::filled(5, 5, Topology::Hex, WrapPolicy::Torus, ()).unwrap();
    assert_eq!(torus.neighbor_coords(0, 0).len(), 6);
}

#[test]
fn test_hex_parity_mirrors_vertical_offsets() {
    let grid = Grid::filled(6, 6, Topology::Hex, WrapPolicy::None, ()).unwrap();
    let row = 3;

    // Even column: upper-left and upper-right sit at row - 1.
    assert_eq!(
        coord_set(grid.neighbor_coords(2, row)),
        coord_set(vec![
            (2, row - 1), // above
            (2, row + 1), // below
            (1, row - 1), // upper left
            (1, row),     // lower left
            (3, row - 1), // upper right
            (3, row),     // lower right
        ])
    );

    // Odd column: the same diagonal neighbors sit at row / row + 1.
    assert_eq!(
        coord_set(grid.neighbor_coords(3, row)),
        coord_set(vec![
            (3, row - 1), // above
            (3, row + 1), // below
            (2, row),     // upper left
            (2, row + 1), // lower left
            (4, row),     // upper right
            (4, row + 1), // lower right
        ])
    );
}

#[test]
fn test_neighbor_order_is_deterministic() {
    let grid = Grid::filled(3, 3, Topology::Table, WrapPolicy::Torus, ()).unwrap();
    // Fixed ordering: left, right, above, below (post-wrap).
    assert_eq!(
        grid.neighbor_coords(1, 1),
        vec![(0, 1), (2, 1), (1, 0), (1, 2)]
    );
    assert_eq!(grid.neighbor_coords(1, 1), grid.neighbor_coords(1, 1));
}

#[test]
fn test_neighbors_returns_values_in_coord_order() {
    let grid = Grid::from_rows(
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]],
        Topology::Table,
        WrapPolicy::None,
    )
    .unwrap();
    assert_eq!(grid.neighbors(1, 1), vec![&4, &6, &2, &8]);
}
