//! Audio graph - owns nodes and message queues

use dasp_graph::{Buffer, Input, NodeData, Processor};
use petgraph::graph::NodeIndex;
use rtrb::{Consumer, Producer, RingBuffer};

use crate::node::{AudioNode, NodeId, ProcessContext};

/// Handle to send messages to a node in an AudioGraph
pub(crate) struct NodeHandle<M: Send + 'static> {
    pub(crate) id: NodeId,
    pub(crate) sender: Producer<M>,
}

// Type-erased wrapper so we can store heterogeneous nodes
trait ErasedNode: Send {
    fn process_erased(&mut self, ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]);
}

struct NodeWrapper<N: AudioNode> {
    node: N,
    receiver: Consumer<N::Message>,
}

impl<N: AudioNode> ErasedNode for NodeWrapper<N> {
    fn process_erased(&mut self, ctx: &ProcessContext, inputs: &[Input], outputs: &mut [Buffer]) {
        // Split borrow to avoid conflict between receiver and node
        let receiver = &mut self.receiver;
        let node = &mut self.node;

        let messages = core::iter::from_fn(|| receiver.pop().ok());
        node.process(ctx, messages, inputs, outputs);
    }
}

// Adapter for dasp_graph
struct DaspAdapter {
    node: Box<dyn ErasedNode>,
    ctx: ProcessContext,
}

impl dasp_graph::Node for DaspAdapter {
    fn process(&mut self, inputs: &[Input], outputs: &mut [Buffer]) {
        self.node.process_erased(&self.ctx, inputs, outputs);
    }
}

type InnerGraph = petgraph::graph::Graph<NodeData<DaspAdapter>, ()>;

/// A mono audio graph at a fixed sample rate.
///
/// Nodes are only ever added, so a [`NodeId`] is the node's petgraph index.
pub(crate) struct AudioGraph {
    graph: InnerGraph,
    processor: Processor<InnerGraph>,
    ctx: ProcessContext,
    terminal: Option<NodeIndex>,
}

impl AudioGraph {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            graph: InnerGraph::with_capacity(8, 8),
            processor: Processor::with_capacity(8),
            ctx: ProcessContext {
                sample_rate,
                buffer_size: Buffer::LEN,
            },
            terminal: None,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.ctx.sample_rate
    }

    /// Add a node whose message queue holds `queue_size` pending messages.
    pub fn add<N: AudioNode>(&mut self, node: N, queue_size: usize) -> NodeHandle<N::Message> {
        let (producer, consumer) = RingBuffer::new(queue_size.max(1));

        let wrapper = NodeWrapper { node, receiver: consumer };
        let adapter = DaspAdapter {
            node: Box::new(wrapper),
            ctx: self.ctx,
        };

        // One buffer per node; sinks use it as scratch
        let idx = self.graph.add_node(NodeData::new1(adapter));

        NodeHandle {
            id: NodeId(idx.index() as u32),
            sender: producer,
        }
    }

    /// Connect output of `from` to input of `to`
    pub fn connect(&mut self, from: NodeId, to: NodeId) {
        self.graph.add_edge(index(from), index(to), ());
    }

    /// Set which node to process to (typically a sink)
    pub fn set_terminal(&mut self, id: NodeId) {
        self.terminal = Some(index(id));
    }

    /// Process one block of audio through the graph
    pub fn process(&mut self) {
        if let Some(terminal) = self.terminal {
            self.processor.process(&mut self.graph, terminal);
        }
    }
}

#[inline]
fn index(id: NodeId) -> NodeIndex {
    NodeIndex::new(id.0 as usize)
}
