//! Command handler for the line-oriented shell

use std::fmt;

use lrucache::LruCache;
use serde::Serialize;

/// Reply to one command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Ok,
    Value(String),
    Nil,
    Integer(i64),
    Lines(Vec<String>),
    Error(String),
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ok => write!(f, "OK"),
            Reply::Value(v) => write!(f, "{}", v),
            Reply::Nil => write!(f, "(nil)"),
            Reply::Integer(n) => write!(f, "{}", n),
            Reply::Lines(lines) if lines.is_empty() => write!(f, "(empty)"),
            Reply::Lines(lines) => write!(f, "{}", lines.join("\n")),
            Reply::Error(msg) => write!(f, "ERR {}", msg),
        }
    }
}

#[derive(Serialize)]
struct Info {
    len: usize,
    capacity: usize,
    hits: u64,
    misses: u64,
    inserts: u64,
    updates: u64,
    evictions: u64,
    hit_ratio: f64,
}

pub struct CommandHandler {
    cache: LruCache<String, String>,
}

impl CommandHandler {
    pub fn new(cache: LruCache<String, String>) -> Self {
        Self { cache }
    }

    /// Handle one input line. Blank lines and `#` comments yield no reply.
    pub fn handle(&mut self, line: &str) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let mut parts = line.split_whitespace();
        let command = parts.next()?.to_uppercase();
        let args: Vec<&str> = parts.collect();

        let reply = match command.as_str() {
            "PUT" | "SET" => self.handle_put(&args),
            "GET" => self.handle_get(&args),
            "PEEK" => self.handle_peek(&args),
            "DEL" => self.handle_del(&args),
            "EXISTS" => self.handle_exists(&args),
            "LEN" => self.handle_len(&args),
            "CAPACITY" => self.handle_capacity(&args),
            "KEYS" => self.handle_keys(&args),
            "CLEAR" => self.handle_clear(&args),
            "INFO" => self.handle_info(&args),
            _ => Reply::Error(format!("unknown command '{}'", command)),
        };
        Some(reply)
    }

    fn handle_put(&mut self, args: &[&str]) -> Reply {
        let [key, value] = args else {
            return wrong_arity("put");
        };
        self.cache.put(key.to_string(), value.to_string());
        Reply::Ok
    }

    fn handle_get(&mut self, args: &[&str]) -> Reply {
        let [key] = args else {
            return wrong_arity("get");
        };
        match self.cache.get(*key) {
            Some(value) => Reply::Value(value.clone()),
            None => Reply::Nil,
        }
    }

    fn handle_peek(&self, args: &[&str]) -> Reply {
        let [key] = args else {
            return wrong_arity("peek");
        };
        match self.cache.peek(*key) {
            Some(value) => Reply::Value(value.clone()),
            None => Reply::Nil,
        }
    }

    fn handle_del(&mut self, args: &[&str]) -> Reply {
        if args.is_empty() {
            return wrong_arity("del");
        }

        let mut deleted = 0i64;
        for key in args {
            if self.cache.remove(*key).is_some() {
                deleted += 1;
            }
        }
        Reply::Integer(deleted)
    }

    fn handle_exists(&self, args: &[&str]) -> Reply {
        if args.is_empty() {
            return wrong_arity("exists");
        }

        let count = args.iter().filter(|key| self.cache.contains(**key)).count();
        Reply::Integer(count as i64)
    }

    fn handle_len(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("len");
        }
        Reply::Integer(self.cache.len() as i64)
    }

    fn handle_capacity(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("capacity");
        }
        Reply::Integer(self.cache.capacity().try_into().unwrap_or(i64::MAX))
    }

    fn handle_clear(&mut self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("clear");
        }
        self.cache.clear();
        Reply::Ok
    }

    fn handle_keys(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("keys");
        }
        Reply::Lines(self.cache.iter().map(|(k, _)| k.clone()).collect())
    }

    fn handle_info(&self, args: &[&str]) -> Reply {
        if !args.is_empty() {
            return wrong_arity("info");
        }

        let stats = self.cache.stats();
        let info = Info {
            len: self.cache.len(),
            capacity: self.cache.capacity(),
            hits: stats.hits(),
            misses: stats.misses(),
            inserts: stats.inserts(),
            updates: stats.updates(),
            evictions: stats.evictions(),
            hit_ratio: stats.hit_ratio(),
        };

        match serde_json::to_string(&info) {
            Ok(json) => Reply::Value(json),
            Err(e) => Reply::Error(e.to_string()),
        }
    }
}

fn wrong_arity(command: &str) -> Reply {
    Reply::Error(format!(
        "wrong number of arguments for '{}' command",
        command
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(capacity: usize) -> CommandHandler {
        CommandHandler::new(LruCache::new(capacity).unwrap())
    }

    fn run(handler: &mut CommandHandler, line: &str) -> Reply {
        handler.handle(line).unwrap()
    }

    #[test]
    fn test_put_and_get() {
        let mut h = handler(3);

        assert_eq!(run(&mut h, "PUT 1 A"), Reply::Ok);
        assert_eq!(run(&mut h, "get 1"), Reply::Value("A".to_string()));
        assert_eq!(run(&mut h, "GET 2"), Reply::Nil);
    }

    #[test]
    fn test_eviction_scenario() {
        let mut h = handler(3);

        for line in ["PUT 1 A", "PUT 2 B", "PUT 3 C", "GET 1", "PUT 4 D"] {
            h.handle(line);
        }

        assert_eq!(run(&mut h, "GET 2"), Reply::Nil);
        assert_eq!(run(&mut h, "GET 3"), Reply::Value("C".to_string()));
        assert_eq!(run(&mut h, "GET 4"), Reply::Value("D".to_string()));
        assert_eq!(run(&mut h, "LEN"), Reply::Integer(3));
    }

    #[test]
    fn test_keys_order() {
        let mut h = handler(3);

        h.handle("PUT a 1");
        h.handle("PUT b 2");
        h.handle("GET a");

        let keys = run(&mut h, "KEYS");
        assert_eq!(keys, Reply::Lines(vec!["b".to_string(), "a".to_string()]));
        assert_eq!(keys.to_string(), "b\na");
    }

    #[test]
    fn test_peek_del_exists() {
        let mut h = handler(2);

        h.handle("PUT a 1");
        h.handle("PUT b 2");

        assert_eq!(run(&mut h, "PEEK a"), Reply::Value("1".to_string()));
        assert_eq!(run(&mut h, "EXISTS a b c"), Reply::Integer(2));
        assert_eq!(run(&mut h, "DEL a c"), Reply::Integer(1));
        assert_eq!(run(&mut h, "EXISTS a"), Reply::Integer(0));
    }

    #[test]
    fn test_clear_and_capacity() {
        let mut h = handler(5);

        h.handle("PUT a 1");
        assert_eq!(run(&mut h, "CLEAR"), Reply::Ok);
        assert_eq!(run(&mut h, "KEYS").to_string(), "(empty)");
        assert_eq!(run(&mut h, "CAPACITY"), Reply::Integer(5));
    }

    #[test]
    fn test_info_json() {
        let mut h = handler(1);

        h.handle("PUT a 1");
        h.handle("PUT b 2");
        h.handle("GET a");

        let Reply::Value(json) = run(&mut h, "INFO") else {
            panic!("INFO should return a value");
        };
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["len"], 1);
        assert_eq!(value["evictions"], 1);
        assert_eq!(value["misses"], 1);
    }

    #[test]
    fn test_errors() {
        let mut h = handler(1);

        assert!(matches!(run(&mut h, "PUT a"), Reply::Error(_)));
        assert!(matches!(run(&mut h, "FROB"), Reply::Error(_)));
        assert_eq!(
            run(&mut h, "GET").to_string(),
            "ERR wrong number of arguments for 'get' command"
        );
    }

    #[test]
    fn test_extra_arguments_rejected() {
        let mut h = handler(2);
        h.handle("PUT a 1");

        for (line, name) in [
            ("KEYS extra", "keys"),
            ("CAPACITY extra", "capacity"),
            ("INFO extra", "info"),
            ("CLEAR extra", "clear"),
            ("LEN extra", "len"),
        ] {
            assert_eq!(
                run(&mut h, line).to_string(),
                format!("ERR wrong number of arguments for '{}' command", name)
            );
        }

        // A rejected CLEAR leaves the cache alone
        assert_eq!(run(&mut h, "LEN"), Reply::Integer(1));
        assert_eq!(run(&mut h, "GET a"), Reply::Value("1".to_string()));
    }

    #[test]
    fn test_del_counts_only_present_keys() {
        let mut h = handler(3);
        h.handle("PUT a 1");
        h.handle("PUT b 2");

        assert_eq!(run(&mut h, "DEL a a b z"), Reply::Integer(2));
        assert_eq!(run(&mut h, "LEN"), Reply::Integer(0));
    }

    #[test]
    fn test_huge_capacity() {
        let mut h = handler(usize::MAX);

        assert_eq!(run(&mut h, "CAPACITY"), Reply::Integer(i64::MAX));
        assert_eq!(run(&mut h, "PUT a 1"), Reply::Ok);
        assert_eq!(run(&mut h, "GET a"), Reply::Value("1".to_string()));
    }

    #[test]
    fn test_comments_and_blanks() {
        let mut h = handler(1);

        assert_eq!(h.handle(""), None);
        assert_eq!(h.handle("   "), None);
        assert_eq!(h.handle("# put 1 A"), None);
    }
}
