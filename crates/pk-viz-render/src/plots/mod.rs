pub mod chart;

mod axes_draw;
