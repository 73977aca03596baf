//! Built-in training text for a freshly constructed model.

/// Default corpus: a handful of short story sentences in plain lowercase prose.
pub const BASE_CORPUS: &str = "once upon a time there was a little fox who lived at the edge of a quiet forest. \
every morning the fox walked to the river to drink and to watch the light dance on the water. \
one day the fox met an old owl sitting on a branch above the path. \
the owl said that the forest was full of stories, and that every story began with a single step. \
the fox wondered where the path would lead, so the fox followed it past the tall trees and the soft green hills. \
at the end of the path there was a small house with a red door and a warm window. \
inside the house lived a kind old woman who baked bread and told tales by the fire. \
she gave the fox a piece of bread and a place by the fire, and the fox listened to her stories until the stars came out. \
when the moon rose over the hills, the fox said good night and walked home along the river. \
and from that day on, the fox visited the little house every evening, and the stories never came to an end. ";
