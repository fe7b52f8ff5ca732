mod gate;
mod registry;
mod scene;
