mod mask;
mod pairs;

pub use mask::{run_mask, ClassifierKind, MaskArgs};
pub use pairs::{run_pairs, PairsArgs};
