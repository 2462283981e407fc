pub mod mode_switch;
pub mod vote_slider;
