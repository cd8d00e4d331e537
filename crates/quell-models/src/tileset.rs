//! Tile set assembly: symmetry variants and neighbour-rule expansion.
//!
//! A tile declaration names its symmetry class; the class fixes how
//! many rotated/reflected variants exist and how the dihedral group
//! acts on variant indices. Neighbour rules are written against
//! canonical variants and expanded to all variants through the action
//! tables, so a rule set never has to enumerate rotations textually.

use indexmap::IndexMap;
use quell_core::{Direction, ModelError};
use quell_solver::Compatibility;

// ── Symmetry classes ───────────────────────────────────────────────

/// Dihedral symmetry class of a tile, named after the glyph whose
/// symmetries the tile shares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymmetryClass {
    /// Fully symmetric: one variant.
    X,
    /// Two-fold line symmetry: two variants.
    I,
    /// Corner tile: four variants.
    L,
    /// Tee tile: four variants.
    T,
    /// No symmetry: eight variants.
    F,
    /// Diagonal symmetry: two variants.
    Backslash,
}

impl SymmetryClass {
    /// Number of distinct rotated/reflected variants.
    pub fn cardinality(self) -> usize {
        match self {
            SymmetryClass::X => 1,
            SymmetryClass::I | SymmetryClass::Backslash => 2,
            SymmetryClass::L | SymmetryClass::T => 4,
            SymmetryClass::F => 8,
        }
    }

    /// The rotation action `a` on variant indices within the class.
    pub fn rotation(self, variant: usize) -> usize {
        match self {
            SymmetryClass::X => variant,
            SymmetryClass::I | SymmetryClass::Backslash => 1 - variant,
            SymmetryClass::L | SymmetryClass::T => (variant + 1) % 4,
            SymmetryClass::F => {
                if variant < 4 {
                    (variant + 1) % 4
                } else {
                    4 + (variant - 1) % 4
                }
            }
        }
    }

    /// The reflection action `b` on variant indices within the class.
    pub fn reflection(self, variant: usize) -> usize {
        match self {
            SymmetryClass::X | SymmetryClass::I => variant,
            SymmetryClass::Backslash => 1 - variant,
            SymmetryClass::L => {
                if variant % 2 == 0 {
                    variant + 1
                } else {
                    variant - 1
                }
            }
            SymmetryClass::T => {
                if variant % 2 == 0 {
                    variant
                } else {
                    4 - variant
                }
            }
            SymmetryClass::F => {
                if variant < 4 {
                    variant + 4
                } else {
                    variant - 4
                }
            }
        }
    }
}

// ── Declarations ───────────────────────────────────────────────────

/// A tile declaration: name, symmetry class, weight, and source pixels.
#[derive(Clone, Debug)]
pub struct TileDef {
    /// Tile name, referenced by neighbour rules.
    pub name: String,
    /// Symmetry class controlling variant expansion.
    pub symmetry: SymmetryClass,
    /// Relative weight, shared by every variant.
    pub weight: f64,
    /// Row-major `tile_size * tile_size` packed-RGBA pixels of
    /// variant 0.
    pub pixels: Vec<u32>,
}

/// A horizontal adjacency rule: `right` may sit immediately to the
/// right of `left`. Vertical rules follow by rotating both sides.
#[derive(Clone, Debug)]
pub struct NeighbourRule {
    /// Name of the left tile.
    pub left: String,
    /// Canonical variant of the left tile.
    pub left_variant: usize,
    /// Name of the right tile.
    pub right: String,
    /// Canonical variant of the right tile.
    pub right_variant: usize,
}

impl NeighbourRule {
    /// Convenience constructor for variant-0 rules.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            left_variant: 0,
            right: right.into(),
            right_variant: 0,
        }
    }
}

// ── Assembled tile set ─────────────────────────────────────────────

/// A fully expanded tile set: per-variant pixels, names, weights, and
/// the sparse compatibility table the solver consumes.
#[derive(Clone, Debug)]
pub struct Tileset {
    tile_size: usize,
    tiles: Vec<Vec<u32>>,
    names: Vec<String>,
    weights: Vec<f64>,
    compat: Compatibility,
}

impl Tileset {
    /// Expand tile declarations and neighbour rules into propagator
    /// data.
    ///
    /// `subset`, when given, keeps only the named tiles; rules touching
    /// excluded tiles fail with [`ModelError::UnknownTile`] rather than
    /// being silently dropped.
    pub fn assemble(
        tile_size: usize,
        defs: &[TileDef],
        rules: &[NeighbourRule],
        subset: Option<&[&str]>,
    ) -> Result<Self, ModelError> {
        let selected: Vec<&TileDef> = defs
            .iter()
            .filter(|def| subset.map_or(true, |names| names.contains(&def.name.as_str())))
            .collect();
        if selected.is_empty() {
            return Err(ModelError::EmptyPatternSet);
        }

        // Variant expansion: action tables map the 8 dihedral group
        // elements {e, a, a2, a3, b, ba, ba2, ba3} onto global variant
        // indices.
        let mut first_occurrence: IndexMap<&str, (usize, SymmetryClass)> = IndexMap::new();
        let mut action: Vec<[usize; 8]> = Vec::new();
        let mut tiles: Vec<Vec<u32>> = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut weights: Vec<f64> = Vec::new();

        for (tile_index, def) in selected.iter().enumerate() {
            if def.pixels.len() != tile_size * tile_size {
                return Err(ModelError::TilePixelMismatch {
                    name: def.name.clone(),
                    expected: tile_size * tile_size,
                    actual: def.pixels.len(),
                });
            }
            if !def.weight.is_finite() || def.weight < 0.0 {
                return Err(ModelError::InvalidWeight {
                    index: tile_index,
                    value: def.weight,
                });
            }

            let base = action.len();
            first_occurrence.insert(def.name.as_str(), (base, def.symmetry));

            for variant in 0..def.symmetry.cardinality() {
                let a = def.symmetry.rotation(variant);
                let a2 = def.symmetry.rotation(a);
                let a3 = def.symmetry.rotation(a2);
                action.push([
                    base + variant,
                    base + a,
                    base + a2,
                    base + a3,
                    base + def.symmetry.reflection(variant),
                    base + def.symmetry.reflection(a),
                    base + def.symmetry.reflection(a2),
                    base + def.symmetry.reflection(a3),
                ]);

                // Variant pixels: 1..3 rotate the previous variant,
                // 4..7 reflect the variant four back.
                let pixels = if variant == 0 {
                    def.pixels.clone()
                } else if variant < 4 {
                    rotated_pixels(&tiles[base + variant - 1], tile_size)
                } else {
                    reflected_pixels(&tiles[base + variant - 4], tile_size)
                };
                tiles.push(pixels);
                names.push(format!("{} {}", def.name, variant));
                weights.push(def.weight);
            }
        }

        // Dense rule recording. dense[d][t][t2]: t2 may lie in
        // direction d from t.
        let variant_count = action.len();
        let mut dense = vec![vec![vec![false; variant_count]; variant_count]; 4];
        let left_axis = Direction::Left.index();
        let down_axis = Direction::Down.index();

        for rule in rules {
            let left = resolve_variant(&first_occurrence, &rule.left, rule.left_variant)?;
            let right = resolve_variant(&first_occurrence, &rule.right, rule.right_variant)?;
            let left = action[left.0][left.1];
            let right = action[right.0][right.1];
            let down = action[left][1];
            let up = action[right][1];

            // The rule plus its three mirror images on the horizontal
            // axis.
            dense[left_axis][right][left] = true;
            dense[left_axis][action[right][6]][action[left][6]] = true;
            dense[left_axis][action[left][4]][action[right][4]] = true;
            dense[left_axis][action[left][2]][action[right][2]] = true;
            // Rotating both sides a quarter turn yields the vertical
            // axis.
            dense[down_axis][up][down] = true;
            dense[down_axis][action[down][6]][action[up][6]] = true;
            dense[down_axis][action[up][4]][action[down][4]] = true;
            dense[down_axis][action[down][2]][action[up][2]] = true;
        }

        // Right and Up are the transposes of Left and Down.
        let right_axis = Direction::Right.index();
        let up_axis = Direction::Up.index();
        for t2 in 0..variant_count {
            for t1 in 0..variant_count {
                dense[right_axis][t2][t1] = dense[left_axis][t1][t2];
                dense[up_axis][t2][t1] = dense[down_axis][t1][t2];
            }
        }

        let compat =
            Compatibility::build(variant_count, |t, d, t2| dense[d.index()][t][t2]);

        Ok(Self {
            tile_size,
            tiles,
            names,
            weights,
            compat,
        })
    }

    /// Tile side length in pixels.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// Number of expanded variants.
    pub fn variant_count(&self) -> usize {
        self.tiles.len()
    }

    /// Pixel buffer of a variant.
    pub fn tile(&self, variant: usize) -> &[u32] {
        &self.tiles[variant]
    }

    /// `"name variant"` label of a variant.
    pub fn name(&self, variant: usize) -> &str {
        &self.names[variant]
    }

    /// Per-variant weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// The assembled compatibility table.
    pub fn compat(&self) -> &Compatibility {
        &self.compat
    }

    pub(crate) fn into_parts(self) -> (usize, Vec<Vec<u32>>, Vec<String>, Vec<f64>, Compatibility)
    {
        (
            self.tile_size,
            self.tiles,
            self.names,
            self.weights,
            self.compat,
        )
    }
}

/// Resolve a rule reference through the action table of the named
/// tile's canonical variant.
fn resolve_variant(
    first_occurrence: &IndexMap<&str, (usize, SymmetryClass)>,
    name: &str,
    variant: usize,
) -> Result<(usize, usize), ModelError> {
    let &(base, symmetry) = first_occurrence
        .get(name)
        .ok_or_else(|| ModelError::UnknownTile {
            name: name.to_string(),
        })?;
    if variant >= symmetry.cardinality() {
        return Err(ModelError::VariantOutOfRange {
            name: name.to_string(),
            variant,
            cardinality: symmetry.cardinality(),
        });
    }
    Ok((base, variant))
}

/// 90 degree clockwise rotation of a square pixel buffer.
fn rotated_pixels(pixels: &[u32], size: usize) -> Vec<u32> {
    let mut out = vec![0; size * size];
    for y in 0..size {
        for x in 0..size {
            out[x + y * size] = pixels[(size - 1 - y) + x * size];
        }
    }
    out
}

/// Horizontal reflection of a square pixel buffer.
fn reflected_pixels(pixels: &[u32], size: usize) -> Vec<u32> {
    let mut out = vec![0; size * size];
    for y in 0..size {
        for x in 0..size {
            out[x + y * size] = pixels[(size - 1 - x) + y * size];
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(name: &str, symmetry: SymmetryClass, pixel: u32) -> TileDef {
        TileDef {
            name: name.into(),
            symmetry,
            weight: 1.0,
            pixels: vec![pixel],
        }
    }

    // ── Symmetry classes ────────────────────────────────────────

    #[test]
    fn cardinalities_match_the_classes() {
        assert_eq!(SymmetryClass::X.cardinality(), 1);
        assert_eq!(SymmetryClass::I.cardinality(), 2);
        assert_eq!(SymmetryClass::Backslash.cardinality(), 2);
        assert_eq!(SymmetryClass::L.cardinality(), 4);
        assert_eq!(SymmetryClass::T.cardinality(), 4);
        assert_eq!(SymmetryClass::F.cardinality(), 8);
    }

    #[test]
    fn rotation_has_the_class_order() {
        // Applying `a` cardinality-many times is the identity for the
        // rotation subgroup of each class.
        for class in [
            SymmetryClass::X,
            SymmetryClass::I,
            SymmetryClass::Backslash,
            SymmetryClass::L,
            SymmetryClass::T,
        ] {
            for v in 0..class.cardinality() {
                let mut w = v;
                for _ in 0..4 {
                    w = class.rotation(w);
                }
                assert_eq!(w, v, "{class:?} rotation order broken at {v}");
            }
        }
        // F splits into two rotation orbits of four.
        for v in 0..8 {
            let mut w = v;
            for _ in 0..4 {
                w = SymmetryClass::F.rotation(w);
            }
            assert_eq!(w, v);
        }
    }

    #[test]
    fn reflection_is_involutive() {
        for class in [
            SymmetryClass::X,
            SymmetryClass::I,
            SymmetryClass::Backslash,
            SymmetryClass::L,
            SymmetryClass::T,
            SymmetryClass::F,
        ] {
            for v in 0..class.cardinality() {
                assert_eq!(class.reflection(class.reflection(v)), v);
            }
        }
    }

    #[test]
    fn actions_stay_within_the_class() {
        for class in [
            SymmetryClass::X,
            SymmetryClass::I,
            SymmetryClass::Backslash,
            SymmetryClass::L,
            SymmetryClass::T,
            SymmetryClass::F,
        ] {
            for v in 0..class.cardinality() {
                assert!(class.rotation(v) < class.cardinality());
                assert!(class.reflection(v) < class.cardinality());
            }
        }
    }

    // ── Pixel transforms ────────────────────────────────────────

    #[test]
    fn variant_pixels_rotate_then_reflect() {
        // An L-class tile with a distinguishable 2x2 buffer.
        let def = TileDef {
            name: "corner".into(),
            symmetry: SymmetryClass::L,
            weight: 1.0,
            pixels: vec![1, 2, 3, 4],
        };
        let set = Tileset::assemble(2, &[def], &[], None).unwrap();
        assert_eq!(set.variant_count(), 4);
        assert_eq!(set.tile(0), &[1, 2, 3, 4]);
        // One quarter turn per variant; two turns flip the buffer.
        assert_eq!(set.tile(1), &[2, 4, 1, 3]);
        assert_eq!(set.tile(2), &[4, 3, 2, 1]);
        assert_eq!(set.tile(3), &[3, 1, 4, 2]);
    }

    // ── Assembly ────────────────────────────────────────────────

    #[test]
    fn variant_names_and_weights_expand() {
        let defs = [
            tile("a", SymmetryClass::X, 0xff0000ff),
            TileDef {
                weight: 2.5,
                ..tile("b", SymmetryClass::I, 0xff00ff00)
            },
        ];
        let set = Tileset::assemble(1, &defs, &[], None).unwrap();
        assert_eq!(set.variant_count(), 3);
        assert_eq!(set.name(0), "a 0");
        assert_eq!(set.name(1), "b 0");
        assert_eq!(set.name(2), "b 1");
        assert_eq!(set.weights(), &[1.0, 2.5, 2.5]);
    }

    #[test]
    fn x_rule_propagates_to_both_axes() {
        let defs = [
            tile("a", SymmetryClass::X, 1),
            tile("b", SymmetryClass::X, 2),
        ];
        let rules = [NeighbourRule::new("a", "b")];
        let set = Tileset::assemble(1, &defs, &rules, None).unwrap();
        let compat = set.compat();
        // b accepts a on its left; a accepts b on its right.
        assert_eq!(compat.list(1, Direction::Left), &[0]);
        assert_eq!(compat.list(0, Direction::Right), &[1]);
        // X-symmetric rules also bind the vertical axis.
        assert_eq!(compat.list(1, Direction::Down), &[0]);
        assert_eq!(compat.list(0, Direction::Up), &[1]);
        assert!(compat.is_symmetric());
    }

    #[test]
    fn i_tile_rule_reaches_rotated_variants() {
        // A vertical line segment next to itself: the horizontal rule
        // on variant 0 must imply the vertical rule on variant 1.
        let defs = [tile("line", SymmetryClass::I, 7)];
        let rules = [NeighbourRule::new("line", "line")];
        let set = Tileset::assemble(1, &defs, &rules, None).unwrap();
        let compat = set.compat();
        assert_eq!(compat.list(0, Direction::Right), &[0]);
        assert_eq!(compat.list(1, Direction::Down), &[1]);
        assert!(compat.is_symmetric());
    }

    #[test]
    fn subset_filters_tiles_and_rules() {
        let defs = [
            tile("keep", SymmetryClass::X, 1),
            tile("drop", SymmetryClass::X, 2),
        ];
        let rules = [NeighbourRule::new("keep", "keep")];
        let set = Tileset::assemble(1, &defs, &rules, Some(&["keep"])).unwrap();
        assert_eq!(set.variant_count(), 1);

        let bad_rules = [NeighbourRule::new("keep", "drop")];
        assert_eq!(
            Tileset::assemble(1, &defs, &bad_rules, Some(&["keep"])).unwrap_err(),
            ModelError::UnknownTile {
                name: "drop".into()
            }
        );
    }

    #[test]
    fn unknown_tile_in_rule_fails() {
        let defs = [tile("a", SymmetryClass::X, 1)];
        let rules = [NeighbourRule::new("a", "ghost")];
        assert_eq!(
            Tileset::assemble(1, &defs, &rules, None).unwrap_err(),
            ModelError::UnknownTile {
                name: "ghost".into()
            }
        );
    }

    #[test]
    fn variant_out_of_range_fails() {
        let defs = [tile("a", SymmetryClass::I, 1)];
        let rules = [NeighbourRule {
            left: "a".into(),
            left_variant: 2,
            right: "a".into(),
            right_variant: 0,
        }];
        assert_eq!(
            Tileset::assemble(1, &defs, &rules, None).unwrap_err(),
            ModelError::VariantOutOfRange {
                name: "a".into(),
                variant: 2,
                cardinality: 2
            }
        );
    }

    #[test]
    fn wrong_pixel_count_fails() {
        let defs = [TileDef {
            pixels: vec![1, 2, 3],
            ..tile("a", SymmetryClass::X, 0)
        }];
        assert!(matches!(
            Tileset::assemble(2, &defs, &[], None).unwrap_err(),
            ModelError::TilePixelMismatch { expected: 4, actual: 3, .. }
        ));
    }

    #[test]
    fn empty_subset_fails() {
        let defs = [tile("a", SymmetryClass::X, 1)];
        assert_eq!(
            Tileset::assemble(1, &defs, &[], Some(&[])).unwrap_err(),
            ModelError::EmptyPatternSet
        );
    }
}
