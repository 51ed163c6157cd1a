//! Built-in machine-learning curriculum.
//!
//! Used when no graph file is configured and as the fallback when graph
//! generation fails.

use crate::types::{Concept, ConceptGraph, Resource};

/// Build the default concept graph.
pub fn default_graph() -> ConceptGraph {
    ConceptGraph::new()
        .with_concept(
            Concept::new("Introduction to ML")
                .with_resource(Resource::new(
                    "video",
                    "Machine Learning Full Course - Edureka",
                    "https://www.youtube.com/watch?v=GwIo3gDZCVQ",
                ))
                .with_resource(Resource::new(
                    "article",
                    "What is Machine Learning?",
                    "https://www.ibm.com/topics/machine-learning",
                )),
        )
        .with_concept(
            Concept::new("Supervised Learning")
                .with_prerequisites(["Introduction to ML"])
                .with_resource(Resource::new(
                    "video",
                    "Supervised Learning - StatQuest",
                    "https://www.youtube.com/watch?v=5qv5w0Xl5XA",
                ))
                .with_resource(Resource::new(
                    "article",
                    "Supervised Learning Overview (Wikipedia)",
                    "https://en.wikipedia.org/wiki/Supervised_learning",
                )),
        )
        .with_concept(
            Concept::new("Unsupervised Learning")
                .with_prerequisites(["Introduction to ML"])
                .with_resource(Resource::new(
                    "video",
                    "Unsupervised Learning - Simplilearn",
                    "https://www.youtube.com/watch?v=3g6h4cS2h0Q",
                ))
                .with_resource(Resource::new(
                    "article",
                    "Unsupervised Learning Explained",
                    "https://www.geeksforgeeks.org/unsupervised-learning/",
                )),
        )
        .with_concept(
            Concept::new("Deep Learning Basics")
                .with_prerequisites(["Supervised Learning", "Unsupervised Learning"])
                .with_resource(Resource::new(
                    "video",
                    "Deep Learning Fundamentals - Simplilearn",
                    "https://www.youtube.com/watch?v=aircAruvnKk",
                ))
                .with_resource(Resource::new(
                    "article",
                    "Introduction to Deep Learning",
                    "https://www.ibm.com/topics/deep-learning",
                )),
        )
        .with_concept(
            Concept::new("Natural Language Processing (NLP)")
                .with_prerequisites(["Deep Learning Basics"])
                .with_resource(Resource::new(
                    "video",
                    "NLP Full Course - Simplilearn",
                    "https://www.youtube.com/watch?v=8u6aF4Lw2xw",
                ))
                .with_resource(Resource::new(
                    "article",
                    "NLP Guide by Google",
                    "https://developers.google.com/machine-learning/guides/text-classification/step-2",
                )),
        )
        .with_concept(
            Concept::new("Computer Vision (CV)")
                .with_prerequisites(["Deep Learning Basics"])
                .with_resource(Resource::new(
                    "video",
                    "Computer Vision Full Course - Edureka",
                    "https://www.youtube.com/watch?v=5rC7b-HB1Vg",
                ))
                .with_resource(Resource::new(
                    "article",
                    "A Beginner's Guide to Computer Vision",
                    "https://www.analyticsvidhya.com/blog/2021/06/computer-vision-an-introduction/",
                )),
        )
        .with_concept(
            Concept::new("Reinforcement Learning")
                .with_prerequisites(["Introduction to ML"])
                .with_resource(Resource::new(
                    "video",
                    "Reinforcement Learning - StatQuest",
                    "https://www.youtube.com/watch?v=2pWv7GOvuf0",
                ))
                .with_resource(Resource::new(
                    "article",
                    "Reinforcement Learning: An Introduction",
                    "https://www.oreilly.com/library/view/reinforcement-learning-an/9780137460880/",
                )),
        )
        .with_concept(
            Concept::new("MLOps Fundamentals")
                .with_prerequisites(["Introduction to ML"])
                .with_resource(Resource::new(
                    "video",
                    "MLOps Tutorial for Beginners - Simplilearn",
                    "https://www.youtube.com/watch?v=06-AZXmwHjo",
                ))
                .with_resource(Resource::new(
                    "article",
                    "What is MLOps?",
                    "https://azure.microsoft.com/en-us/resources/cloud-computing-dictionary/what-is-mlops/",
                )),
        )
}
