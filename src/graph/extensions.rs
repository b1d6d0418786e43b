use crate::graph::{
    amplify::{Amplify, Gain},
    mix::Layer,
    node::GraphNode,
    through::Through,
};

pub trait NodeExt: GraphNode + Sized {
    fn amplify<M>(self, modulator: M) -> Amplify<Self, M> {
        Amplify::new(self, modulator)
    }

    fn through<F: GraphNode>(self, filter: F) -> Through<Self, F> {
        Through::new(self, filter)
    }

    fn layer<B: GraphNode>(self, other: B) -> Layer<Self, B> {
        Layer::new(self, other)
    }

    fn gain_db(self, db: f32) -> Gain<Self> {
        Gain::db(self, db)
    }

    fn boxed(self) -> Box<dyn GraphNode>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<T: GraphNode> NodeExt for T {}
