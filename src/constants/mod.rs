pub mod background;
pub mod game;

// Frame size in terminal cells, border included. The inner 40x30 cells give
// 80x120 braille dots, the same 2:3 ratio as the logical playfield.
pub const WIDTH: u16 = 42;
pub const HEIGHT: u16 = 32;

pub const TITLE_TEXT: &str = r#"
 ___ _____ ___  ___ __  __
/ __|_   _/ _ \| _ \  \/  |
\__ \ | || (_) |   / |\/| |
|___/ |_| \___/|_|_\_|  |_|
     ___ ___ ___ ___
    | _ )_ _| _ \   \
    | _ \| ||   / |) |
    |___/___|_|_\___/
"#;
