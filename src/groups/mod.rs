//! `Gq` (the quadratic-residue subgroup of a safe-prime modulus) and its
//! paired exponent group `Zq`.

pub mod gq;
pub mod zq;

pub use gq::{GqElement, GqGroup};
pub use zq::{ZqElement, ZqGroup};
