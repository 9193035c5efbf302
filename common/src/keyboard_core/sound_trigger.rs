use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    time::Duration,
};

use crossbeam::channel::{RecvTimeoutError, Sender};
use log::{debug, info, warn};

/// ChucK program played on every activation: a high-passed noise burst and a
/// 10 kHz sine, both with sub-millisecond envelopes.
pub const CLICK_SCRIPT: &str = r#"// mechanical keyboard click
Noise clickNoise => HPF noiseHPF => ADSR noiseEnv => dac;
SinOsc clickSine => ADSR sineEnv => dac;

1.0 => clickNoise.gain;
5000 => noiseHPF.freq;
noiseEnv.set(0, 1, 0.0003, 0.02);

10000 => clickSine.freq;
1.0 => clickSine.gain;
sineEnv.set(0, 1, 0.0001, 0.015);

noiseEnv.keyOn();
sineEnv.keyOn();
1::ms => now;
noiseEnv.keyOff();
sineEnv.keyOff();
10::ms => now;
"#;

/// how often finished engine processes are reaped while idle
const REAP_INTERVAL: Duration = Duration::from_millis(250);

pub fn write_script(path: impl AsRef<Path>) -> io::Result<()> {
    std::fs::write(path, CLICK_SCRIPT)
}

/// Fire-and-forget launcher of the external sound engine.
///
/// [`SoundTrigger::trigger`] only pushes onto an unbounded channel, so the
/// frame loop never waits on process creation. A single dispatcher thread owns
/// the launched children and reaps them, which keeps zombies from piling up
/// without ever waiting for a sound to finish.
#[derive(Debug, Clone)]
pub struct SoundTrigger {
    sender: Option<Sender<()>>,
}

impl SoundTrigger {
    pub fn new(engine: impl Into<OsString>, script_path: impl Into<PathBuf>) -> Self {
        let engine = engine.into();
        let script_path = script_path.into();
        info!(
            "sound engine {:?} with script {}",
            engine,
            script_path.display()
        );
        Self::spawn_with(move || {
            Command::new(&engine)
                .arg(&script_path)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .map(Some)
        })
    }

    /// Every trigger is a no-op.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// `launch` runs on the dispatcher thread once per trigger. A returned
    /// child is reaped later, `None` means there is nothing to wait for.
    pub fn spawn_with<F>(launch: F) -> Self
    where
        F: FnMut() -> io::Result<Option<Child>> + Send + 'static,
    {
        let (sender, receiver) = crossbeam::channel::unbounded::<()>();
        let spawned = std::thread::Builder::new()
            .name("sound-trigger".into())
            .spawn(move || Dispatcher::new(launch).run(receiver));
        match spawned {
            Ok(_) => Self {
                sender: Some(sender),
            },
            Err(err) => {
                warn!("cannot start sound dispatcher, sound disabled: {err}");
                Self::disabled()
            }
        }
    }

    #[cfg(test)]
    fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    pub fn trigger(&self) {
        if let Some(sender) = &self.sender {
            // a dead dispatcher only means silence
            let _ = sender.send(());
        }
    }
}

struct Dispatcher<F> {
    launch: F,
    children: Vec<Child>,
    failures: usize,
}

impl<F> Dispatcher<F>
where
    F: FnMut() -> io::Result<Option<Child>>,
{
    fn new(launch: F) -> Self {
        Self {
            launch,
            children: Vec::new(),
            failures: 0,
        }
    }

    fn run(mut self, receiver: crossbeam::channel::Receiver<()>) {
        loop {
            match receiver.recv_timeout(REAP_INTERVAL) {
                Ok(()) => self.launch_once(),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            self.reap();
        }
        debug!(
            "sound dispatcher stopped, {} engine processes left running",
            self.children.len()
        );
    }

    fn launch_once(&mut self) {
        match (self.launch)() {
            Ok(child) => {
                debug!("sound engine launched");
                self.children.extend(child);
            }
            Err(err) if self.failures == 0 => {
                self.failures += 1;
                warn!("failed to launch sound engine: {err}");
            }
            Err(err) => {
                self.failures += 1;
                debug!("failed to launch sound engine ({} times): {err}", self.failures);
            }
        }
    }

    fn reap(&mut self) {
        self.children
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}
