use std::time::Duration;

pub enum Command {
    Delete {
        key: String,
    },
    Get {
        key: String,
    },
    Set {
        key: String,
        value: String,
        ttl: Duration,
    },
}

impl Command {
    pub fn delete(key: String) -> Self {
        Self::Delete { key }
    }
    pub fn get(key: String) -> Self {
        Self::Get { key }
    }
    pub fn set(key: String, value: String, ttl: Duration) -> Self {
        Self::Set { key, value, ttl }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "DEL",
            Self::Get { .. } => "GET",
            Self::Set { .. } => "SET",
        }
    }
}

impl From<Command> for redis::Cmd {
    fn from(command: Command) -> Self {
        match command {
            Command::Delete { key } => redis::cmd("DEL").arg(&key).clone(),
            Command::Get { key } => redis::cmd("GET").arg(&key).clone(),
            // Redis rejects `EX 0`, so sub-second TTLs round up to one second.
            Command::Set { key, value, ttl } => redis::cmd("SET")
                .arg(&key)
                .arg(&value)
                .arg("EX")
                .arg(ttl.as_secs().max(1))
                .clone(),
        }
    }
}
