//! Catalog of triply periodic surface functions.
//!
//! Every function takes the three already scaled, phase-shifted and
//! axis-permuted arguments and is 2π-periodic in each of them. The zero
//! level set of the returned value is the surface.
//!
//! Functions are looked up by the names a host UI shows, see [`names`] and
//! [`lookup`].

use crate::float_types::{FRAC_PI_2, Real};

/// Signature shared by every catalog entry.
pub type SurfaceFn = fn(Real, Real, Real) -> Real;

/// `cos 2a · cos 2b + cos 2b · cos 2c + cos 2c · cos 2a`
#[inline]
fn double_cos_pairs(x: Real, y: Real, z: Real) -> Real {
    let (c2x, c2y, c2z) = ((2.0 * x).cos(), (2.0 * y).cos(), (2.0 * z).cos());
    c2x * c2y + c2y * c2z + c2z * c2x
}

/// `cos a · cos b + cos b · cos c + cos c · cos a`
#[inline]
fn cos_pairs(x: Real, y: Real, z: Real) -> Real {
    let (cx, cy, cz) = (x.cos(), y.cos(), z.cos());
    cx * cy + cy * cz + cz * cx
}

/// Gyroid surface.
pub fn gyroid(x: Real, y: Real, z: Real) -> Real {
    x.sin() * y.cos() + y.sin() * z.cos() + z.sin() * x.cos()
}

/// Primitive Schwarz surface.
pub fn schwarz_p(x: Real, y: Real, z: Real) -> Real {
    x.cos() + y.cos() + z.cos()
}

/// Diamond Schwarz surface.
pub fn schwarz_d(x: Real, y: Real, z: Real) -> Real {
    let (sx, cx) = x.sin_cos();
    let (sy, cy) = y.sin_cos();
    let (sz, cz) = z.sin_cos();
    sx * sy * sz + sx * cy * cz + cx * sy * cz + cx * cy * sz
}

/// Neovius surface.
pub fn neovius(x: Real, y: Real, z: Real) -> Real {
    let (cx, cy, cz) = (x.cos(), y.cos(), z.cos());
    3.0 * cx + cy + cz + 4.0 * cx * cy * cz
}

/// Schoen's I-WP surface.
pub fn schoen_iwp(x: Real, y: Real, z: Real) -> Real {
    2.0 * cos_pairs(x, y, z) - ((2.0 * x).cos() + (2.0 * y).cos() + (2.0 * z).cos())
}

/// Schoen's F-RD surface.
pub fn schoen_frd(x: Real, y: Real, z: Real) -> Real {
    4.0 * x.cos() * y.cos() * z.cos() - double_cos_pairs(x, y, z)
}

/// Fischer-Koch S surface.
pub fn fischer_koch_s(x: Real, y: Real, z: Real) -> Real {
    (2.0 * x).cos() * y.sin() * z.cos()
        + x.cos() * (2.0 * y).cos() * z.sin()
        + x.sin() * y.cos() * (2.0 * z).cos()
}

/// Primitive My surface.
pub fn pmy(x: Real, y: Real, z: Real) -> Real {
    2.0 * x.cos() * y.cos() * z.cos()
        + (2.0 * x).sin() * y.sin()
        + x.sin() * (2.0 * z).sin()
        + (2.0 * y).sin() * z.sin()
}

/// Honeycomb surface.
pub fn honeycomb(x: Real, y: Real, z: Real) -> Real {
    x.sin() * (y + FRAC_PI_2).cos() + (y + FRAC_PI_2).sin() + z.cos()
}

/// Lidinoid surface.
pub fn lidinoid(x: Real, y: Real, z: Real) -> Real {
    0.5 * ((2.0 * x).sin() * y.cos() * z.sin()
        + (2.0 * y).sin() * z.cos() * x.sin()
        + (2.0 * z).sin() * x.cos() * y.sin())
        - 0.5 * double_cos_pairs(x, y, z)
        + 0.3
}

/// Split P surface, double-frequency primitive variant.
pub fn split_p(x: Real, y: Real, z: Real) -> Real {
    1.1 * ((2.0 * x).sin() * y.cos() * z.sin()
        + (2.0 * y).sin() * z.cos() * x.sin()
        + (2.0 * z).sin() * x.cos() * y.sin())
        - 0.2 * double_cos_pairs(x, y, z)
        - 0.4 * ((2.0 * x).cos() + (2.0 * y).cos() + (2.0 * z).cos())
}

/// Split P surface, base-frequency primitive variant.
pub fn split_p_base(x: Real, y: Real, z: Real) -> Real {
    1.1 * ((2.0 * x).sin() * z.sin() * y.cos()
        + (2.0 * y).sin() * x.sin() * z.cos()
        + (2.0 * z).sin() * y.sin() * x.cos())
        - 0.2 * double_cos_pairs(x, y, z)
        - 0.4 * (x.cos() + y.cos() + z.cos())
}

/// Honeycomb gyroid, extruded along the third argument.
pub fn honeycomb_gyroid(x: Real, y: Real, _z: Real) -> Real {
    x.sin() * y.cos() + y.sin() + x.cos()
}

/// Honeycomb primitive, extruded along the third argument.
pub fn honeycomb_primitive(x: Real, y: Real, _z: Real) -> Real {
    x.cos() + y.cos()
}

/// Honeycomb diamond, extruded along the third argument.
pub fn honeycomb_diamond(x: Real, y: Real, _z: Real) -> Real {
    let (sx, cx) = x.sin_cos();
    let (sy, cy) = y.sin_cos();
    cx * cy + sx * sy + sx * cy + cx * sy
}

/// Honeycomb I, extruded along the third argument.
pub fn honeycomb_i(x: Real, y: Real, _z: Real) -> Real {
    x.cos() * y.cos() + y.cos() + x.cos()
}

/// Honeycomb L, extruded along the third argument.
pub fn honeycomb_l(x: Real, y: Real, _z: Real) -> Real {
    1.1 * ((2.0 * x).sin() * y.cos() + (2.0 * y).sin() * x.sin() + x.cos() * y.sin())
        - ((2.0 * x).cos() * (2.0 * y).cos() + (2.0 * y).cos() + (2.0 * x).cos())
}

/// Schwarz's SC surface.
pub fn sc(x: Real, y: Real, z: Real) -> Real {
    2.0 * (x.cos() + y.cos() + z.cos()) + cos_pairs(x, y, z)
}

/// I surface.
pub fn i(x: Real, y: Real, z: Real) -> Real {
    cos_pairs(x, y, z)
}

/// P surface (sine form).
pub fn p(x: Real, y: Real, z: Real) -> Real {
    x.sin() + y.sin() + z.sin()
}

/// P_W surface.
pub fn p_w(x: Real, y: Real, z: Real) -> Real {
    4.0 * cos_pairs(x, y, z) - 3.0 * x.cos() * y.cos() * z.cos()
}

/// Double gyroid surface.
pub fn double_gyroid(x: Real, y: Real, z: Real) -> Real {
    2.75 * ((2.0 * x).sin() * z.sin() * y.cos()
        + (2.0 * y).sin() * x.sin() * z.cos()
        + (2.0 * z).sin() * y.sin() * x.cos())
        - double_cos_pairs(x, y, z)
}

/// G' surface.
pub fn g_prime(x: Real, y: Real, z: Real) -> Real {
    5.0 * ((2.0 * x).sin() * z.sin() * y.cos()
        + (2.0 * y).sin() * x.sin() * z.cos()
        + (2.0 * z).sin() * y.sin() * x.cos())
        + double_cos_pairs(x, y, z)
}

/// Double diamond surface.
pub fn double_diamond(x: Real, y: Real, z: Real) -> Real {
    let (s2x, c2x) = (2.0 * x).sin_cos();
    let (s2y, c2y) = (2.0 * y).sin_cos();
    let (s2z, c2z) = (2.0 * z).sin_cos();
    s2x * s2y + s2y * s2z + s2x * s2z + c2x * c2y * c2z
}

/// D' surface.
pub fn d_prime(x: Real, y: Real, z: Real) -> Real {
    x.sin() * y.sin() * z.sin() + x.cos() * y.cos() * z.cos() - double_cos_pairs(x, y, z) - 0.4
}

/// Double P surface.
pub fn double_p(x: Real, y: Real, z: Real) -> Real {
    0.5 * cos_pairs(x, y, z) + 0.2 * ((2.0 * x).cos() + (2.0 * y).cos() + (2.0 * z).cos())
}

/// OCTO surface.
pub fn octo(x: Real, y: Real, z: Real) -> Real {
    let (cx, cy, cz) = (x.cos(), y.cos(), z.cos());
    4.0 * cos_pairs(x, y, z) - 2.8 * cx * cy * cz + (cx + cy + cz) + 1.5
}

/// PN surface.
pub fn pn(x: Real, y: Real, z: Real) -> Real {
    let (cx, cy, cz) = (x.cos(), y.cos(), z.cos());
    let (c2x, c2y, c2z) = ((2.0 * x).cos(), (2.0 * y).cos(), (2.0 * z).cos());
    0.6 * (cx * cy * cz)
        + 0.4 * (cx + cy + cz)
        + 0.2 * (c2x * c2y * c2z)
        + 0.2 * (c2x + c2y + c2z)
        + 0.1 * ((3.0 * x).cos() + (3.0 * y).cos() + (3.0 * z).cos())
        + 0.2 * cos_pairs(x, y, z)
}

/// KP surface.
pub fn kp(x: Real, y: Real, z: Real) -> Real {
    0.6 * (x.cos() + y.cos() + z.cos()) + 0.7 * cos_pairs(x, y, z)
        - 0.9 * ((2.0 * x).cos() * (2.0 * y).cos() * (2.0 * z).cos())
        + 0.4
}

/// FRD surface.
///
/// Unlike [`schoen_frd`] only the first double-frequency pair is subtracted.
pub fn frd(x: Real, y: Real, z: Real) -> Real {
    let (c2x, c2y, c2z) = ((2.0 * x).cos(), (2.0 * y).cos(), (2.0 * z).cos());
    8.0 * x.cos() * y.cos() * z.cos() + c2x * c2y * c2z - c2x * c2y + c2y * c2z + c2z * c2x
}

/// Name → function table, sorted by name (ASCII order).
static CATALOG: [(&str, SurfaceFn); 30] = [
    ("Dprime", d_prime),
    ("FRD", frd),
    ("Gprime", g_prime),
    ("I", i),
    ("KP", kp),
    ("OCTO", octo),
    ("P", p),
    ("PN", pn),
    ("P_W", p_w),
    ("SC", sc),
    ("doubleP", double_p),
    ("double_diamond", double_diamond),
    ("double_gyroid", double_gyroid),
    ("fischerKochS", fischer_koch_s),
    ("gyroid", gyroid),
    ("honeycomb", honeycomb),
    ("honeycomb_I", honeycomb_i),
    ("honeycomb_L", honeycomb_l),
    ("honeycomb_diamond", honeycomb_diamond),
    ("honeycomb_gyroid", honeycomb_gyroid),
    ("honeycomb_primitive", honeycomb_primitive),
    ("lidinoid", lidinoid),
    ("neovius", neovius),
    ("pmy", pmy),
    ("schoenFRD", schoen_frd),
    ("schoenIWP", schoen_iwp),
    ("schwarzD", schwarz_d),
    ("schwarzP", schwarz_p),
    ("splitP", split_p_base),
    ("split_p", split_p),
];

/// Look up a surface by its catalog name.
pub fn lookup(name: &str) -> Option<SurfaceFn> {
    CATALOG
        .binary_search_by(|(key, _)| key.cmp(&name))
        .ok()
        .map(|index| CATALOG[index].1)
}

/// All catalog names, in ASCII order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

/// All catalog entries, in ASCII order.
pub fn catalog() -> &'static [(&'static str, SurfaceFn)] {
    &CATALOG
}
