pub mod highgui_preview;
