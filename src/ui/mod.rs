pub mod figure_panel;
