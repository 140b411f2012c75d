pub mod dynect;
