use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ProcessCommand {
    program: PathBuf,
    args: Vec<String>,
    envs: Vec<(String, String)>,
}

pub enum SpawnCommandResult {
    CommandNotFound { program: PathBuf },
    Spawned(anyhow::Result<std::process::Child>),
}

impl SpawnCommandResult {
    pub fn into_result(self) -> anyhow::Result<std::process::Child> {
        match self {
            SpawnCommandResult::CommandNotFound { program } => {
                Err(anyhow::anyhow!("Command {:?} is not found", program))
            }
            SpawnCommandResult::Spawned(result) => result,
        }
    }
}

impl ProcessCommand {
    pub fn new(program: impl Into<PathBuf>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            envs: Vec::new(),
        }
    }

    /// Set an environment variable on the child process.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn spawn(&self) -> SpawnCommandResult {
        log::debug!("ProcessCommand::spawn {}", self);
        if which::which(&self.program).is_err() {
            log::info!("ProcessCommand::spawn: Failed to locate {:?}", self.program);
            SpawnCommandResult::CommandNotFound {
                program: self.program.clone(),
            }
        } else {
            SpawnCommandResult::Spawned(
                std::process::Command::new(&self.program)
                    .args(&self.args)
                    .envs(self.envs.iter().map(|(key, value)| (key, value)))
                    .stdin(std::process::Stdio::piped())
                    .stdout(std::process::Stdio::piped())
                    .stderr(std::process::Stdio::piped())
                    .spawn()
                    .map_err(|e| {
                        anyhow::anyhow!(
                            "Failed to spawn the command: {:?} with error: {:?}",
                            self,
                            e
                        )
                    }),
            )
        }
    }
}

impl std::fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.program.display(), self.args.join(" "))
    }
}
