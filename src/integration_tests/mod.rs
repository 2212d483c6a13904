/*!
Scenarios running several modules together through the full simulation loop.
*/
mod collision;
mod drawing;
mod frame_pacing;
mod world_files;
