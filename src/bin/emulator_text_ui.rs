use std::error::Error as _;
use std::fs;
use std::path::PathBuf;
use std::thread;

use clap::Parser;
use log::{error, info};

use chip8_cpu::{
    chip::chip8::cursive_display::FrameView, ChannelDisplay, Cpu, CpuConfig, CpuError, Mute,
    QuirkSet, SharedKeyboard,
};

/// How much the arrow keys change the speed by.
const SPEED_STEP_IN_HZ: u32 = 25;

/// Frames the UI may lag behind before old ones are dropped.
const FRAME_QUEUE_LEN: usize = 4;

/// Maps the left hand side of a QWERTY keyboard onto the hex keypad.
const KEY_MAP: [(char, u8); 16] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// Runs a CHIP-8 program in the terminal.
///
/// Keys 1-4, q-r, a-f and z-v make up the keypad. Terminals do not report key releases,
/// so space releases all keys. Up and down change the speed, p pauses and Esc quits.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the program to load.
    rom: PathBuf,

    /// Instructions per second.
    #[arg(short, long, default_value_t = CpuConfig::default().speed_in_hz)]
    speed: u32,

    /// Instructions per frame, timers tick and the screen refreshes once per frame.
    #[arg(short, long, default_value_t = CpuConfig::default().cycles_per_frame)]
    cycles_per_frame: u32,

    /// Compatibility preset: chip8, modern or schip.
    #[arg(short, long, default_value = "chip8")]
    quirks: QuirkSet,
}

/// Errors that end the emulator.
#[derive(Debug, thiserror::Error)]
enum Error {
    #[error("could not read {}", path.display())]
    ReadProgram {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Cpu(#[from] CpuError),

    #[error("the emulator thread panicked")]
    WorkerPanicked,
}

/// Loads the program, spawns the CPU and the frame forwarder and runs the UI until Esc
/// is pressed.
fn run(args: Args) -> Result<(), Error> {
    let program = fs::read(&args.rom).map_err(|source| Error::ReadProgram {
        path: args.rom.clone(),
        source,
    })?;

    let keyboard = SharedKeyboard::new();
    let keys = keyboard.handle();
    let (display, frames) = ChannelDisplay::new(FRAME_QUEUE_LEN);

    let config = CpuConfig {
        quirks: args.quirks,
        speed_in_hz: args.speed,
        cycles_per_frame: args.cycles_per_frame,
        ..CpuConfig::default()
    };
    let mut cpu = Cpu::with_config(config, Box::new(display), Box::new(keyboard), Box::new(Mute))?;
    cpu.boot()?;
    cpu.load_program(&program)?;
    info!("loaded {}", args.rom.display());

    let control = cpu.control();
    let mut siv = cursive::default();

    let cb_sink = siv.cb_sink().clone();
    thread::spawn(move || {
        for frame in frames.iter() {
            if !FrameView::push(frame, &cb_sink) {
                return;
            }
        }
    });

    let worker = thread::spawn(move || {
        let result = cpu.run();
        if let Err(e) = &result {
            error!("emulation stopped: {}", e);
        }
        result
    });

    for (c, key) in KEY_MAP {
        let keys = keys.clone();
        siv.add_global_callback(c, move |_s| keys.press(key));
    }

    siv.add_global_callback(' ', move |_s| keys.release_all());

    let speed = control.clone();
    siv.add_global_callback(cursive::event::Key::Up, move |_s| {
        speed.set_speed_in_hz(speed.speed_in_hz().saturating_add(SPEED_STEP_IN_HZ));
    });

    let speed = control.clone();
    siv.add_global_callback(cursive::event::Key::Down, move |_s| {
        speed.set_speed_in_hz(speed.speed_in_hz().saturating_sub(SPEED_STEP_IN_HZ));
    });

    let pause = control.clone();
    siv.add_global_callback('p', move |_s| {
        if pause.is_paused() {
            pause.start();
        } else {
            pause.stop();
        }
    });

    let quit = control.clone();
    siv.add_global_callback(cursive::event::Key::Esc, move |s| {
        quit.request_quit();
        s.quit();
    });

    siv.add_layer(FrameView::default());
    siv.run();

    control.request_quit();
    worker.join().map_err(|_| Error::WorkerPanicked)??;
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("{}", e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {}", cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}
