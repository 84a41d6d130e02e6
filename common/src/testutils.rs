use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::client::{ClientError, Coordinator, NodeRecord};

/// Coordination service kept in memory, with an operation log and failure injection.
///
/// The root "/" always exists.
#[derive(Default)]
pub struct MemoryTree {
    nodes: Mutex<BTreeMap<String, Vec<u8>>>,
    // child count reported by `get` regardless of the real one
    stale_child_counts: Mutex<HashMap<String, usize>>,
    failures: Mutex<HashMap<(Op, String), String>>,
    // `children` lists names in descending order instead of ascending
    descending_children: std::sync::atomic::AtomicBool,
    log: Mutex<Vec<(Op, String)>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Exists,
    Get,
    Children,
    Create,
    Set,
    Delete,
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(idx) => &path[..idx],
    }
}

fn direct_children(nodes: &BTreeMap<String, Vec<u8>>, path: &str) -> Vec<String> {
    nodes
        .keys()
        .filter(|candidate| candidate.as_str() != "/" && parent_of(candidate) == path)
        .map(|candidate| candidate[candidate.rfind('/').unwrap() + 1..].to_string())
        .collect()
}

impl MemoryTree {
    pub fn new() -> Self {
        let tree = Self::default();
        tree.nodes.lock().unwrap().insert("/".to_string(), vec![]);
        tree
    }

    /// Builds a tree from `(path, data)` pairs, creating missing ancestors as empty nodes.
    pub fn with_nodes(nodes: &[(&str, &str)]) -> Self {
        let tree = Self::new();
        for (path, data) in nodes {
            tree.insert(path, data.as_bytes());
        }
        tree
    }

    pub fn insert(&self, path: &str, data: &[u8]) {
        let mut nodes = self.nodes.lock().unwrap();
        for ancestor in crate::znode::ancestry(path) {
            nodes.entry(ancestor).or_default();
        }
        nodes.insert(path.to_string(), data.to_vec());
    }

    pub fn data(&self, path: &str) -> Option<Vec<u8>> {
        self.nodes.lock().unwrap().get(path).cloned()
    }

    pub fn data_str(&self, path: &str) -> Option<String> {
        self.data(path)
            .map(|data| String::from_utf8(data).unwrap())
    }

    /// All paths under (and including) `root`, relative to `root`, with their data.
    pub fn subtree(&self, root: &str) -> BTreeMap<String, Vec<u8>> {
        let nodes = self.nodes.lock().unwrap();
        nodes
            .iter()
            .filter_map(|(path, data)| {
                if path == root {
                    return Some((String::new(), data.clone()));
                }
                let prefix = if root == "/" {
                    "/".to_string()
                } else {
                    format!("{root}/")
                };
                path.strip_prefix(&prefix)
                    .map(|relative| (relative.to_string(), data.clone()))
            })
            .collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.nodes.lock().unwrap().keys().cloned().collect()
    }

    pub fn report_child_count(&self, path: &str, num_children: usize) {
        self.stale_child_counts
            .lock()
            .unwrap()
            .insert(path.to_string(), num_children);
    }

    pub fn list_children_descending(&self) {
        self.descending_children
            .store(true, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn fail(&self, op: Op, path: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert((op, path.to_string()), message.to_string());
    }

    pub fn log(&self) -> Vec<(Op, String)> {
        self.log.lock().unwrap().clone()
    }

    pub fn ops(&self, op: Op) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|(logged, _)| *logged == op)
            .map(|(_, path)| path)
            .collect()
    }

    pub fn mutations(&self) -> usize {
        self.log()
            .iter()
            .filter(|(op, _)| matches!(op, Op::Create | Op::Set | Op::Delete))
            .count()
    }

    fn record(&self, op: Op, path: &str) -> Result<(), ClientError> {
        self.log.lock().unwrap().push((op, path.to_string()));
        if let Some(message) = self.failures.lock().unwrap().get(&(op, path.to_string())) {
            return Err(ClientError::Other(anyhow::anyhow!("{}", message)));
        }
        Ok(())
    }
}

impl Coordinator for MemoryTree {
    async fn exists(&self, path: &str) -> Result<bool, ClientError> {
        self.record(Op::Exists, path)?;
        Ok(self.nodes.lock().unwrap().contains_key(path))
    }

    async fn get(&self, path: &str) -> Result<NodeRecord, ClientError> {
        self.record(Op::Get, path)?;
        let nodes = self.nodes.lock().unwrap();
        let data = nodes.get(path).cloned().ok_or(ClientError::NoNode)?;
        let num_children = match self.stale_child_counts.lock().unwrap().get(path) {
            Some(count) => *count,
            None => direct_children(&nodes, path).len(),
        };
        Ok(NodeRecord { data, num_children })
    }

    async fn children(&self, path: &str) -> Result<Vec<String>, ClientError> {
        self.record(Op::Children, path)?;
        let nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path) {
            return Err(ClientError::NoNode);
        }
        let mut children = direct_children(&nodes, path);
        if self
            .descending_children
            .load(std::sync::atomic::Ordering::Relaxed)
        {
            children.reverse();
        }
        Ok(children)
    }

    async fn create(&self, path: &str, data: &[u8]) -> Result<(), ClientError> {
        self.record(Op::Create, path)?;
        let mut nodes = self.nodes.lock().unwrap();
        if nodes.contains_key(path) {
            return Err(ClientError::NodeExists);
        }
        if !nodes.contains_key(parent_of(path)) {
            return Err(ClientError::NoNode);
        }
        nodes.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn set(&self, path: &str, data: &[u8]) -> Result<(), ClientError> {
        self.record(Op::Set, path)?;
        let mut nodes = self.nodes.lock().unwrap();
        let node = nodes.get_mut(path).ok_or(ClientError::NoNode)?;
        *node = data.to_vec();
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.record(Op::Delete, path)?;
        let mut nodes = self.nodes.lock().unwrap();
        if !nodes.contains_key(path) {
            return Err(ClientError::NoNode);
        }
        if !direct_children(&nodes, path).is_empty() {
            return Err(ClientError::NotEmpty);
        }
        nodes.remove(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_requires_parent() {
        let tree = MemoryTree::new();
        assert!(matches!(
            tree.create("/a/b", b"").await,
            Err(ClientError::NoNode)
        ));
        tree.create("/a", b"").await.unwrap();
        tree.create("/a/b", b"x").await.unwrap();
        assert!(matches!(
            tree.create("/a/b", b"").await,
            Err(ClientError::NodeExists)
        ));
        assert_eq!(tree.data_str("/a/b").unwrap(), "x");
    }

    #[tokio::test]
    async fn children_of_root_and_nested() {
        let tree = MemoryTree::with_nodes(&[("/a/b", "1"), ("/a/c", "2"), ("/d", "3")]);
        let mut root_children = tree.children("/").await.unwrap();
        root_children.sort();
        assert_eq!(root_children, vec!["a", "d"]);
        assert_eq!(tree.get("/a").await.unwrap().num_children, 2);
        assert_eq!(tree.get("/a/b").await.unwrap().num_children, 0);
    }

    #[tokio::test]
    async fn children_order() {
        let tree = MemoryTree::with_nodes(&[("/a/x", ""), ("/a/y", ""), ("/a/z", "")]);
        assert_eq!(tree.children("/a").await.unwrap(), vec!["x", "y", "z"]);
        tree.list_children_descending();
        assert_eq!(tree.children("/a").await.unwrap(), vec!["z", "y", "x"]);
    }

    #[tokio::test]
    async fn delete_is_single_node() {
        let tree = MemoryTree::with_nodes(&[("/a/b", "1")]);
        assert!(matches!(tree.delete("/a").await, Err(ClientError::NotEmpty)));
        tree.delete("/a/b").await.unwrap();
        tree.delete("/a").await.unwrap();
        assert!(matches!(tree.delete("/a").await, Err(ClientError::NoNode)));
    }
}
