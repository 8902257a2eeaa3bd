//! Whole-game scenarios driven through [`crate::Game`]
