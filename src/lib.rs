pub mod avl_tree;
pub mod rank_tree;
pub mod lehmer;
pub mod input;
pub mod error;
