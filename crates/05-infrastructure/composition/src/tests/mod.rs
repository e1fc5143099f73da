mod injection_tests;
