//! One module per §8 scenario (S1-S6).

pub mod s1_single_source;
pub mod s2_five_source;
pub mod s3_depeg;
pub mod s4_outlier_after_clamp;
pub mod s5_reorg_with_replacement;
pub mod s6_cross_chain_weakest_link;
