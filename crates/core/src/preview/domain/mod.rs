pub mod frame_observer;
