//! Terminal front end for the human-played game.

pub mod flappy_scene;
