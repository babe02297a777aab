use std::io;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use sysinfo::{Pid, System};

/// How the supervisor talks to the OS. Split out so the switch order can be observed.
pub trait PlayerBackend {
    type Process;

    /// Player processes running right now.
    fn running(&mut self) -> Vec<Self::Process>;
    /// Starts a player on `clip` without waiting for it.
    fn launch(&mut self, clip: &Path) -> io::Result<()>;
    fn terminate(&mut self, process: Self::Process);
}

pub struct ProcessSupervisor<B> {
    backend: B,
}

impl<B: PlayerBackend> ProcessSupervisor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Starts `clip` and only then kills whatever was playing before, so the old clip
    /// stays on screen until the new player covers it.
    pub fn switch_to(&mut self, clip: &Path) -> io::Result<()> {
        let old = self.backend.running();
        self.backend.launch(clip)?;
        for process in old {
            self.backend.terminate(process);
        }
        Ok(())
    }
}

/// Runs omxplayer-style players and finds them in the process table by name.
///
/// `omxplayer` is a wrapper script around `omxplayer.bin`, so the process to kill is
/// not the child we spawn; old players are matched by `process_name` instead.
pub struct SystemPlayer {
    program: String,
    process_name: String,
    layer: u32,
    system: System,
    children: Vec<Child>,
}

impl SystemPlayer {
    pub fn new(program: impl Into<String>, process_name: impl Into<String>, layer: u32) -> Self {
        Self {
            program: program.into(),
            process_name: process_name.into(),
            layer,
            system: System::new(),
            children: vec![],
        }
    }

    fn command(&self, clip: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--no-keys")
            .arg("--layer")
            .arg(self.layer.to_string())
            .arg(clip)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    fn reap(&mut self) {
        self.children
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl PlayerBackend for SystemPlayer {
    type Process = Pid;

    fn running(&mut self) -> Vec<Pid> {
        self.system.refresh_processes();
        self.system
            .processes_by_exact_name(&self.process_name)
            .map(|p| p.pid())
            .collect()
    }

    fn launch(&mut self, clip: &Path) -> io::Result<()> {
        self.reap();
        let mut cmd = self.command(clip);
        tracing::info!(?cmd, "starting player");
        let child = cmd.spawn()?;
        self.children.push(child);
        Ok(())
    }

    fn terminate(&mut self, pid: Pid) {
        match self.system.process(pid) {
            Some(process) => {
                if !process.kill() {
                    tracing::warn!(%pid, "could not kill old player");
                }
            }
            None => tracing::debug!(%pid, "old player already gone"),
        }
    }
}
