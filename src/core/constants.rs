// Tick and timing
pub const DEFAULT_TICKS_PER_SECOND: u32 = 30;

// World
pub const WIN_WIDTH: u32 = 600;
pub const WIN_HEIGHT: u32 = 800;
pub const FLOOR_Y: f64 = 700.0;

// Bird physics (units per tick)
pub const BIRD_SPAWN_X: f64 = 230.0;
pub const BIRD_SPAWN_Y: f64 = 350.0;
pub const SOLO_SPAWN_Y: f64 = 50.0;
pub const JUMP_VELOCITY: f64 = -10.5;
pub const GRAVITY: f64 = 3.0;
pub const TERMINAL_VELOCITY: f64 = 16.0;
pub const UPWARD_BIAS: f64 = 2.0;

// Bird tilt (degrees)
pub const MAX_TILT: f64 = 25.0;
pub const MIN_TILT: f64 = -90.0;
pub const ROTATION_STEP: f64 = 20.0;
pub const TILT_HOLD_DISTANCE: f64 = 50.0;
/// Below this tilt the bird stops flapping and holds its first frame.
pub const DIVE_FRAME_TILT: f64 = -80.0;

// Animation
pub const ANIMATION_TICKS: u32 = 5;

// Pipes
pub const PIPE_GAP: f64 = 200.0;
pub const GAP_CENTER_MIN: i32 = 50;
pub const GAP_CENTER_MAX: i32 = 450;
pub const PIPE_VELOCITY: f64 = 5.0;
pub const FIRST_PIPE_X: f64 = 700.0;

// Floor
pub const FLOOR_VELOCITY: f64 = 5.0;

// Out-of-bounds rules
pub const CEILING_Y: f64 = -50.0;
pub const FLOOR_MARGIN: f64 = 10.0;

// Multi-agent sessions end once this many pipes are passed
pub const SCORE_CEILING: u32 = 22;

// Decision functions jump when their output exceeds this
pub const JUMP_THRESHOLD: f64 = 0.5;

// Default sprite geometry (reference art scaled 2x)
pub const BIRD_WIDTH: u32 = 68;
pub const BIRD_HEIGHT: u32 = 48;
pub const BIRD_FRAMES: usize = 3;
pub const PIPE_WIDTH: u32 = 104;
pub const PIPE_HEIGHT: u32 = 640;
pub const PIPE_LIP_HEIGHT: u32 = 48;
pub const PIPE_BODY_INSET: u32 = 4;
pub const FLOOR_WIDTH: u32 = 672;
